//! Noyau exact (rationnels i64)
//!
//! Organisation interne :
//! - rationnel.rs : Rationnel (arithmétique vérifiée, puissance fractionnaire)
//! - registre.rs  : opérateurs / fonctions par nom, priorités, arité
//! - jetons.rs    : tokenisation (unaire/binaire, virgule décimale ou d’argument)
//! - rpn.rs       : shunting-yard + comptage des arguments
//! - eval.rs      : machine à pile + Expression + démarche
//! - lecture.rs   : lecture décimale (BigInt, sans débordement)
//! - reglages.rs  : précision de lecture, associativité de ^
//! - erreur.rs    : erreurs classées

pub mod erreur;
pub mod eval;
pub mod jetons;
pub mod lecture;
pub mod rationnel;
pub mod registre;
pub mod reglages;
pub mod rpn;


#[cfg(test)]
mod tests_fuzz_safe;

#[cfg(test)]
mod proptests;

// API publique minimale
pub use erreur::ErreurCalcul;
pub use eval::{eval_expression, eval_rpn, Demarche, Expression};
pub use lecture::vers_decimal;
pub use rationnel::Rationnel;
pub use registre::{registre_global, Arite, Associativite, Registre};
pub use reglages::Reglages;

/// Abonné tracing pour les tests (`RUST_LOG=debug cargo test`), installé une fois.
#[cfg(test)]
pub(crate) fn init_traces() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
