// src/noyau/erreur.rs
//
// Erreurs classées du pipeline (jetons -> RPN -> pile).
// Chaque échec remonte une de ces variantes : jamais de message “générique”.

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErreurCalcul {
    #[error("Entrée vide")]
    EmptyExpression,

    #[error("parenthèses déséquilibrées")]
    UnbalancedBrackets,

    #[error("caractère inattendu: '{texte}' (position {position})")]
    UnexpectedCharacter { texte: String, position: usize },

    #[error("'(' attendue après la fonction {nom}")]
    ExpectedOpenParen { nom: String },

    #[error("opérande manquant")]
    MissingOperand,

    /// Pile finale vide ou avec plusieurs valeurs (opérateur manquant, virgule mal placée…)
    #[error("expression invalide (opérateur ou opérande manquant)")]
    MalformedExpression,

    #[error("la fonction {nom} attend {attendu} argument(s), reçu {recu}")]
    ArityMismatch {
        nom: String,
        attendu: usize,
        recu: usize,
    },

    #[error("division par zéro")]
    DivisionByZero,

    #[error("racine paire d’un nombre négatif")]
    EvenRootOfNegative,

    #[error("dépassement de capacité (entier 64 bits)")]
    Overflow,

    #[error("nombre invalide: {0:?}")]
    MalformedNumber(String),

    #[error("nom déjà enregistré: {0}")]
    DuplicateName(String),

    #[error("nom déjà utilisé par un opérateur ou une fonction: {0}")]
    NameCollision(String),

    /// Valeur réelle inexistante (ex: asin(7) => NaN).
    #[error("hors domaine: {0}")]
    DomainError(String),
}

impl ErreurCalcul {
    /// Raccourci pour un symbole/nom non reconnu.
    pub(crate) fn inattendu(texte: impl Into<String>, position: usize) -> Self {
        ErreurCalcul::UnexpectedCharacter {
            texte: texte.into(),
            position,
        }
    }
}
