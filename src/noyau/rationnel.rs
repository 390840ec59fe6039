// src/noyau/rationnel.rs
//
// Rationnel exact sur entiers 64 bits.
// - Invariant : dénominateur > 0 (jamais nul après construction).
// - Réduit (pgcd) à la construction depuis un entier, un décimal ou un flottant.
// - + − × ÷ ne réduisent pas : les grandeurs peuvent croître au fil d’un calcul.
//   Si le résultat brut sort de i64, on tente la forme réduite, sinon Overflow.
// - Comparaisons par produit en croix (i128 : jamais de dépassement).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use super::erreur::ErreurCalcul;

/// Nombre de décimales conservées (texte décimal et conversion depuis un flottant).
pub const PRECISION_CHIFFRES: usize = 9;

/// 10^PRECISION_CHIFFRES : dénominateur de départ de `from_f64`.
pub const PRECISION: i64 = 1_000_000_000;

#[derive(Clone, Copy, Debug)]
pub struct Rationnel {
    num: i64,
    den: i64,
}

/* ------------------------ Outils entiers ------------------------ */

fn pgcd_u128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn pgcd(a: i64, b: i64) -> i64 {
    // b > 0 dans tous les appels : le résultat tient dans i64
    pgcd_u128(a.unsigned_abs() as u128, b.unsigned_abs() as u128) as i64
}

/// Ramène un couple i128 (den > 0) dans i64 :
/// d’abord tel quel (pas de réduction), sinon sous forme réduite.
fn ajuste(num: i128, den: i128) -> Result<Rationnel, ErreurCalcul> {
    if let (Ok(n), Ok(d)) = (i64::try_from(num), i64::try_from(den)) {
        return Ok(Rationnel { num: n, den: d });
    }

    let g = pgcd_u128(num.unsigned_abs(), den.unsigned_abs()) as i128;
    let n = i64::try_from(num / g).map_err(|_| ErreurCalcul::Overflow)?;
    let d = i64::try_from(den / g).map_err(|_| ErreurCalcul::Overflow)?;
    Ok(Rationnel { num: n, den: d })
}

/// Entier décimal non signé (suite de chiffres) -> i64, via BigInt.
fn parse_entier(txt: &str, source: &str) -> Result<i64, ErreurCalcul> {
    if txt.is_empty() {
        return Ok(0);
    }
    if !txt.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErreurCalcul::MalformedNumber(source.to_string()));
    }
    let n = BigInt::parse_bytes(txt.as_bytes(), 10)
        .ok_or_else(|| ErreurCalcul::MalformedNumber(source.to_string()))?;
    n.to_i64().ok_or(ErreurCalcul::Overflow)
}

/* ------------------------ Construction ------------------------ */

impl Rationnel {
    pub const ZERO: Rationnel = Rationnel { num: 0, den: 1 };
    pub const UN: Rationnel = Rationnel { num: 1, den: 1 };

    /// Fraction brute `num/den` (non réduite). Le signe passe au numérateur.
    pub fn new(num: i64, den: i64) -> Result<Self, ErreurCalcul> {
        if den == 0 {
            return Err(ErreurCalcul::DivisionByZero);
        }
        if den < 0 {
            let n = num.checked_neg().ok_or(ErreurCalcul::Overflow)?;
            let d = den.checked_neg().ok_or(ErreurCalcul::Overflow)?;
            return Ok(Self { num: n, den: d });
        }
        Ok(Self { num, den })
    }

    pub fn from_integer(n: i64) -> Self {
        Self { num: n, den: 1 }
    }

    /// Flottant -> rationnel : partie fractionnaire arrondie à 9 décimales, puis réduite.
    pub fn from_f64(x: f64) -> Result<Self, ErreurCalcul> {
        if x.is_nan() {
            return Err(ErreurCalcul::DomainError(
                "le résultat n’est pas un nombre réel".into(),
            ));
        }
        if !x.is_finite() {
            return Err(ErreurCalcul::Overflow);
        }

        let entier = x.trunc();
        // i64::MAX as f64 vaut 2^63 (hors plage) : borne stricte
        if entier >= i64::MAX as f64 || entier < i64::MIN as f64 {
            return Err(ErreurCalcul::Overflow);
        }
        let entier = entier as i64;

        let arrondi = ((x - entier as f64) * PRECISION as f64).round() as i64;
        let g = pgcd(arrondi, PRECISION);
        let den = PRECISION / g;
        let num = entier
            .checked_mul(den)
            .and_then(|v| v.checked_add(arrondi / g))
            .ok_or(ErreurCalcul::Overflow)?;

        Ok(Self { num, den })
    }

    /* ------------------------ Accès / conversions ------------------------ */

    pub fn numer(&self) -> i64 {
        self.num
    }

    pub fn denom(&self) -> i64 {
        self.den
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Copie exacte en grand rationnel (lecture décimale).
    pub fn to_big(&self) -> BigRational {
        BigRational::new(BigInt::from(self.num), BigInt::from(self.den))
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    pub fn is_integer(&self) -> bool {
        self.num % self.den == 0
    }

    /// Forme irréductible.
    pub fn reduit(&self) -> Self {
        let g = pgcd(self.num, self.den);
        Self {
            num: self.num / g,
            den: self.den / g,
        }
    }

    /* ------------------------ Arithmétique ------------------------ */

    pub fn checked_add(self, o: Self) -> Result<Self, ErreurCalcul> {
        if self.den == o.den {
            let num = self.num as i128 + o.num as i128;
            return ajuste(num, self.den as i128);
        }
        let num = self.num as i128 * o.den as i128 + o.num as i128 * self.den as i128;
        ajuste(num, self.den as i128 * o.den as i128)
    }

    pub fn checked_sub(self, o: Self) -> Result<Self, ErreurCalcul> {
        if self.den == o.den {
            let num = self.num as i128 - o.num as i128;
            return ajuste(num, self.den as i128);
        }
        let num = self.num as i128 * o.den as i128 - o.num as i128 * self.den as i128;
        ajuste(num, self.den as i128 * o.den as i128)
    }

    pub fn checked_mul(self, o: Self) -> Result<Self, ErreurCalcul> {
        ajuste(
            self.num as i128 * o.num as i128,
            self.den as i128 * o.den as i128,
        )
    }

    /// Division : refusée si le résultat serait infini (diviseur nul).
    pub fn checked_div(self, o: Self) -> Result<Self, ErreurCalcul> {
        if o.is_zero() {
            return Err(ErreurCalcul::DivisionByZero);
        }
        let mut num = self.num as i128 * o.den as i128;
        let mut den = self.den as i128 * o.num as i128;
        if den < 0 {
            num = -num;
            den = -den;
        }
        ajuste(num, den)
    }

    pub fn checked_neg(self) -> Result<Self, ErreurCalcul> {
        let num = self.num.checked_neg().ok_or(ErreurCalcul::Overflow)?;
        Ok(Self { num, den: self.den })
    }

    /// Fraction retournée (numérateur <-> dénominateur).
    pub fn inverse(self) -> Result<Self, ErreurCalcul> {
        Self::new(self.den, self.num)
    }

    pub fn abs(self) -> Result<Self, ErreurCalcul> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }

    /// Partie entière (plancher), exacte.
    pub fn partie_entiere(self) -> Self {
        Self::from_integer(self.num.div_euclid(self.den))
    }

    /* ------------------------ Puissance fractionnaire ------------------------ */

    /// self^exposant, exposant rationnel quelconque.
    ///
    /// Calcul : (|bn|^en)^(1/ed) / (bd^en)^(1/ed) en flottant, relu en rationnel
    /// (9 décimales), puis signe et retournement.
    /// Exact seulement si le résultat est un rationnel représentable à cette précision.
    pub fn puissance(self, exposant: Self) -> Result<Self, ErreurCalcul> {
        let base = self.reduit();
        let exposant = exposant.reduit();

        let base_negative = base.is_negative();
        let exposant_negatif = exposant.is_negative();

        let en = exposant.num.unsigned_abs();
        let ed = exposant.den as u64;
        let en_impair = en % 2 == 1;

        if base_negative && en_impair && ed % 2 == 0 {
            return Err(ErreurCalcul::EvenRootOfNegative);
        }

        let racine = 1.0 / ed as f64;
        let haut = (base.num.unsigned_abs() as f64).powf(en as f64).powf(racine);
        let bas = (base.den as f64).powf(en as f64).powf(racine);

        let valeur = if haut.is_finite() && bas.is_finite() {
            haut / bas
        } else {
            // bn^en ou bd^en hors des flottants : on passe par le quotient
            (base.num.unsigned_abs() as f64 / base.den as f64).powf(en as f64 / ed as f64)
        };

        let mut r = Self::from_f64(valeur)?;

        if base_negative && en_impair {
            r = r.checked_neg()?;
        }
        if exposant_negatif {
            r = r.inverse()?;
        }

        Ok(r)
    }
}

impl Default for Rationnel {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Rationnel {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

/// Texte décimal "[ent].[frac]" (séparateur '.' ou ',') -> rationnel réduit.
///
/// La partie fractionnaire est tronquée à `PRECISION_CHIFFRES` chiffres.
impl FromStr for Rationnel {
    type Err = ErreurCalcul;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let texte = s.replace(',', ".");
        if texte.is_empty() {
            return Err(ErreurCalcul::MalformedNumber(s.to_string()));
        }

        let (ent, frac) = match texte.split_once('.') {
            Some((e, f)) => (e, f),
            None => (texte.as_str(), ""),
        };

        let entier = parse_entier(ent, s)?;

        // tous les chiffres sont ASCII : découpe par octets sûre
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ErreurCalcul::MalformedNumber(s.to_string()));
        }
        let frac = &frac[..frac.len().min(PRECISION_CHIFFRES)];

        let mut num = parse_entier(frac, s)?;
        let mut den = 10_i64.pow(frac.len() as u32);

        let g = pgcd(num, den);
        num /= g;
        den /= g;

        let num = entier
            .checked_mul(den)
            .and_then(|v| v.checked_add(num))
            .ok_or(ErreurCalcul::Overflow)?;

        Ok(Self { num, den })
    }
}

/* ------------------------ Comparaisons (produit en croix) ------------------------ */

impl PartialEq for Rationnel {
    fn eq(&self, o: &Self) -> bool {
        self.cmp(o) == Ordering::Equal
    }
}

impl Eq for Rationnel {}

impl PartialOrd for Rationnel {
    fn partial_cmp(&self, o: &Self) -> Option<Ordering> {
        Some(self.cmp(o))
    }
}

impl Ord for Rationnel {
    fn cmp(&self, o: &Self) -> Ordering {
        let a = self.num as i128 * o.den as i128;
        let b = o.num as i128 * self.den as i128;
        a.cmp(&b)
    }
}

impl Hash for Rationnel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let r = self.reduit();
        r.num.hash(state);
        r.den.hash(state);
    }
}

impl fmt::Display for Rationnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reduit();
        if r.den == 1 {
            write!(f, "{}", r.num)
        } else {
            write!(f, "{}/{}", r.num, r.den)
        }
    }
}
