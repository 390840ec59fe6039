//! Calculatrice fractions : évaluation exacte d’expressions arithmétiques.
//!
//! texte -> jetons -> RPN (shunting-yard) -> pile de `Rationnel`
//!
//! ```
//! use calculatrice_fractions::{eval_expression, Rationnel};
//!
//! let r = eval_expression("1/2 + 1/3").unwrap();
//! assert_eq!(r, Rationnel::new(5, 6).unwrap());
//! ```
//!
//! Un registre explicite permet d’ajouter ses propres fonctions :
//!
//! ```
//! use calculatrice_fractions::{Arite, Expression, Registre};
//!
//! let mut registre = Registre::par_defaut();
//! registre
//!     .ajouter_fonction("min", 5, Arite::Exacte(2), |a| Ok(a[0].min(a[1])))
//!     .unwrap();
//! let r = Expression::new("min(1, 2)").unwrap().evaluer(&registre).unwrap();
//! assert_eq!(r.to_string(), "1");
//! ```

pub mod noyau;

pub use noyau::{
    eval_expression, registre_global, vers_decimal, Arite, Associativite, Demarche,
    ErreurCalcul, Expression, Rationnel, Registre, Reglages,
};
