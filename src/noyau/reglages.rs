//! Réglages du noyau (sans évaluation ici).
//!
//! - `chiffres` : précision des lectures décimales (Démarche), bornée.
//! - `associativite_puissance` : sens de `^` pour 2^3^2.
//!   Par défaut gauche : 2^3^2 = (2^3)^2 = 64.

use super::registre::Associativite;

/// Précision de lecture par défaut.
pub const CHIFFRES_DEFAUT: usize = 20;

/// Garde-fou : on borne la précision (anti-abus / anti-gel).
pub const CHIFFRES_MAX: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub chiffres: usize,
    pub associativite_puissance: Associativite,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            chiffres: CHIFFRES_DEFAUT,
            associativite_puissance: Associativite::Gauche,
        }
    }
}

impl Reglages {
    /// Limite digits (évite abus / gel du rendu BigInt).
    pub fn set_chiffres(&mut self, chiffres: usize) {
        self.chiffres = chiffres.min(CHIFFRES_MAX);
    }

    pub fn avec_chiffres(mut self, chiffres: usize) -> Self {
        self.set_chiffres(chiffres);
        self
    }

    pub fn avec_puissance(mut self, associativite: Associativite) -> Self {
        self.associativite_puissance = associativite;
        self
    }
}
