//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - expressions bien formées : seules les erreurs numériques sont admises
//! - texte arbitraire : toujours une erreur classée ou un résultat, jamais de panique

use std::time::{Duration, Instant};

use super::erreur::ErreurCalcul;
use super::eval::{eval_expression, Expression};
use super::registre::{registre_global, Arite, Registre};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choix<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

/// Erreurs normales sur une expression bien formée : le domaine numérique est limité.
fn is_erreur_numerique(e: &ErreurCalcul) -> bool {
    matches!(
        e,
        ErreurCalcul::DivisionByZero
            | ErreurCalcul::EvenRootOfNegative
            | ErreurCalcul::Overflow
            | ErreurCalcul::DomainError(_)
    )
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    // inclut 0 (utile pour tester les divisions par zéro)
    let a = rng.pick(10);
    match rng.pick(4) {
        0 => format!("{a}.{}", rng.pick(100)),
        1 => format!("{a},5"),
        2 => format!("{a}/{}", 1 + rng.pick(8)),
        _ => format!("{a}"),
    }
}

fn gen_exposant(rng: &mut Rng) -> String {
    rng.choix(&["2", "3", "0", "(1/2)", "(1/3)", "(-1)", "(2/3)", "0.5"])
        .to_string()
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_nombre(rng);
    }

    let a = gen_expr(rng, depth - 1);
    match rng.pick(10) {
        0 => gen_nombre(rng),
        1 => format!("({a}+{})", gen_expr(rng, depth - 1)),
        2 => format!("({a}-{})", gen_expr(rng, depth - 1)),
        3 => format!("({a}*{})", gen_expr(rng, depth - 1)),
        4 => format!("({a}/{})", gen_expr(rng, depth - 1)),
        5 => format!("({a})^{}", gen_exposant(rng)),
        6 => format!("-{a}"),
        // parenthèse ordinaire dans l’appel : "3,5" y reste un nombre décimal
        7 => format!("{}(({a}))", rng.choix(&["sin", "cos", "atan", "abs", "int"])),
        8 => format!("sqrt(({a}))"),
        _ => format!("{a}e{}", rng.pick(3)),
    }
}

/// Expression entière (+ - * et parenthèses) : le résultat, s’il existe, est entier.
fn gen_entier(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 || rng.pick(4) == 0 {
        return format!("{}", rng.pick(20));
    }
    let op = rng.choix(&["+", "-", "*"]);
    let a = gen_entier(rng, depth - 1);
    let b = gen_entier(rng, depth - 1);
    if rng.coin() {
        format!("({a}{op}{b})")
    } else {
        format!("{a}{op}-{b}")
    }
}

/// Texte quelconque sur un alphabet proche de la grammaire.
fn gen_bruit(rng: &mut Rng, longueur: usize) -> String {
    const MORCEAUX: &[&str] = &[
        "0", "1", "7", "42", ".", ",", "+", "-", "*", "/", "^", "(", ")", "e", "E", " ", "sin",
        "sqrt", "min", "abs", "x", "#", "é", "()", ",,", "..",
    ];
    (0..longueur).map(|_| rng.choix(MORCEAUX)).collect()
}

fn registre_hote() -> Registre {
    let mut r = Registre::par_defaut();
    r.ajouter_fonction("min", 5, Arite::Exacte(2), |a| Ok(a[0].min(a[1])))
        .unwrap();
    r
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);

        match eval_expression(&expr) {
            Ok(r) => {
                assert!(r.denom() > 0, "dénominateur négatif: expr={expr:?}");
                assert!(r.to_f64().is_finite(), "expr={expr:?}");
                seen_ok += 1;
            }
            Err(e) => {
                assert!(
                    is_erreur_numerique(&e),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let generer = || {
        let mut rng = Rng::new(0xBADC0DE_u64);
        (0..100)
            .map(|_| {
                let expr = gen_expr(&mut rng, 3);
                (expr.clone(), eval_expression(&expr))
            })
            .collect::<Vec<_>>()
    };
    // Même seed => mêmes expressions => mêmes sorties
    assert_eq!(generer(), generer());
}

#[test]
fn fuzz_safe_entiers_restent_entiers() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_entier(&mut rng, 5);
        match eval_expression(&expr) {
            Ok(r) => assert!(r.is_integer(), "expr={expr:?} r={r}"),
            Err(e) => assert_eq!(e, ErreurCalcul::Overflow, "expr={expr:?}"),
        }
    }
}

#[test]
fn fuzz_safe_bruit_jamais_de_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);

    let registre = registre_hote();
    let mut rng = Rng::new(0xDEADBEEF_u64);

    let mut seen_ok = 0usize;
    for _ in 0..1000 {
        budget(t0, max);

        let longueur = 1 + rng.pick(12) as usize;
        let texte = gen_bruit(&mut rng, longueur);

        // Ok ou erreur classée : seule l’absence de panique compte
        if let Ok(r) = Expression::new(&texte).and_then(|e| e.evaluer(&registre)) {
            assert!(r.denom() > 0, "texte={texte:?}");
            seen_ok += 1;
        }
    }
    assert!(seen_ok > 0, "aucun texte valide : bruit trop “sale”");
}

#[test]
fn fuzz_safe_registre_global_et_explicite_concordent() {
    let mut rng = Rng::new(0xFACADE_u64);
    let registre = Registre::par_defaut();

    for _ in 0..100 {
        let expr = gen_expr(&mut rng, 3);
        let via_global = Expression::new(&expr).and_then(|e| e.evaluer(registre_global()));
        let via_local = Expression::new(&expr).and_then(|e| e.evaluer(&registre));
        assert_eq!(via_global, via_local, "expr={expr:?}");
    }
}
