//! Propriétés (proptest) : arithmétique exacte + pipeline.

use proptest::prelude::*;

use super::eval::eval_expression;
use super::lecture::vers_decimal;
use super::rationnel::Rationnel;

// petits rationnels : aucun débordement possible sur quelques opérations
fn petit_rationnel() -> impl Strategy<Value = Rationnel> {
    (-1000i64..1000i64, 1i64..1000i64).prop_map(|(n, d)| Rationnel::new(n, d).unwrap())
}

fn rationnel_non_nul() -> impl Strategy<Value = Rationnel> {
    (
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)],
        1i64..1000i64,
    )
        .prop_map(|(n, d)| Rationnel::new(n, d).unwrap())
}

// décimal canonique : pas de zéro de queue, au plus 9 décimales
fn texte_decimal() -> impl Strategy<Value = String> {
    (0u32..1_000_000u32, "[0-9]{0,8}[1-9]").prop_map(|(e, f)| format!("{e}.{f}"))
}

proptest! {
    #[test]
    fn addition_commutative(a in petit_rationnel(), b in petit_rationnel()) {
        prop_assert_eq!(a.checked_add(b).unwrap(), b.checked_add(a).unwrap());
    }

    #[test]
    fn multiplication_commutative(a in petit_rationnel(), b in petit_rationnel()) {
        prop_assert_eq!(a.checked_mul(b).unwrap(), b.checked_mul(a).unwrap());
    }

    #[test]
    fn identite_division(a in petit_rationnel(), b in rationnel_non_nul()) {
        let q = a.checked_div(b).unwrap();
        prop_assert_eq!(q.checked_mul(b).unwrap(), a);
        prop_assert!(q.denom() > 0);
    }

    #[test]
    fn reduit_apres_lecture(s in texte_decimal()) {
        let r: Rationnel = s.parse().unwrap();
        let red = r.reduit();
        prop_assert_eq!((r.numer(), r.denom()), (red.numer(), red.denom()));
        prop_assert!(r.denom() > 0);
    }

    #[test]
    fn aller_retour_decimal(s in texte_decimal()) {
        let r: Rationnel = s.parse().unwrap();
        prop_assert_eq!(vers_decimal(&r, 9), s);
    }

    #[test]
    fn pipeline_et_arithmetique_concordent(
        a in -1000i64..1000,
        b in -1000i64..1000,
        c in -1000i64..1000,
    ) {
        let attendu = a + b * c;
        let r = eval_expression(&format!("{a}+{b}*{c}")).unwrap();
        prop_assert_eq!(r, Rationnel::from_integer(attendu));
    }

    #[test]
    fn texte_quelconque_sans_panique(s in "\\PC{0,40}") {
        let _ = eval_expression(&s);
    }
}
