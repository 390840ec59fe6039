// src/noyau/lecture.rs
//
// ΣLocal : lecture décimale d’un Rationnel.
// Calcul en BigInt (entier “scalé” ×10^digits) : le rendu ne déborde jamais,
// même quand num·10^digits dépasse i64.

use num_bigint::BigInt;
use num_traits::Signed;

use super::rationnel::Rationnel;

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier “scalé” tronqué vers zéro = trunc(r * 10^digits)
fn rational_scaled(r: &Rationnel, digits: usize) -> BigInt {
    let big = r.to_big();
    (big.numer() * pow10(digits)) / big.denom()
}

/// r -> entier “scalé” arrondi (demi loin de zéro)
fn rational_scaled_arrondi(r: &Rationnel, digits: usize) -> BigInt {
    let big = r.to_big();
    let n = big.numer().abs() * pow10(digits);
    let d = big.denom().clone();
    let q: BigInt = (n * 2 + &d) / (d * 2);
    if big.numer().is_negative() {
        -q
    } else {
        q
    }
}

/* ------------------------ API ------------------------ */

/// Développement décimal tronqué, exactement `digits` décimales.
pub fn vers_decimal_tronque(r: &Rationnel, digits: usize) -> String {
    // BigInt tronque vers zéro : -0.5 à 0 décimale donne "0", sans signe
    scaled_to_decimal(rational_scaled(r, digits), digits)
}

/// Lecture arrondie à `digits` décimales, zéros de queue retirés ("0.5", "-2", "0.333").
pub fn vers_decimal(r: &Rationnel, digits: usize) -> String {
    let scaled = rational_scaled_arrondi(r, digits);
    let mut txt = scaled_to_decimal(scaled, digits);

    if txt.contains('.') {
        while txt.ends_with('0') {
            txt.pop();
        }
        if txt.ends_with('.') {
            txt.pop();
        }
    }
    if txt == "-0" {
        txt = "0".to_string();
    }
    txt
}
