//! Noyau : évaluation (pipeline réel)
//!
//! texte -> tokenize -> to_rpn -> eval_rpn (pile de Rationnel) -> résultat exact
//!
//! Le registre est passé explicitement à chaque étape ; `eval_expression`
//! utilise le registre global par défaut.

use tracing::{debug, trace};

use super::erreur::ErreurCalcul;
use super::jetons::{format_tokens, tokenize, Genre, Tok};
use super::lecture::vers_decimal;
use super::rationnel::Rationnel;
use super::registre::{registre_global, Arite, Registre};
use super::reglages::Reglages;
use super::rpn::to_rpn;

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Demarche {
    pub jetons: String,
    pub rpn: String,
    /// Fraction réduite ("7/2", "-3").
    pub exact: String,
    /// Lecture décimale arrondie à `Reglages::chiffres`.
    pub lecture: String,
}

fn inconnu(tok: &Tok) -> ErreurCalcul {
    ErreurCalcul::inattendu(tok.texte.clone(), tok.position)
}

fn depile(pile: &mut Vec<Rationnel>) -> Result<Rationnel, ErreurCalcul> {
    pile.pop().ok_or(ErreurCalcul::MissingOperand)
}

/// Machine à pile sur une RPN produite par `to_rpn`.
#[tracing::instrument(level = "debug", skip_all, fields(n = rpn.len()))]
pub fn eval_rpn(rpn: &[Tok], registre: &Registre) -> Result<Rationnel, ErreurCalcul> {
    let mut pile: Vec<Rationnel> = Vec::new();

    for tok in rpn {
        match tok.genre {
            Genre::Nombre => pile.push(tok.texte.parse::<Rationnel>()?),

            // séparateur : l’argument précédent doit exister
            Genre::Virgule => {
                if pile.is_empty() {
                    return Err(ErreurCalcul::MissingOperand);
                }
            }

            Genre::Unaire => {
                let op = registre.unaire(&tok.texte).ok_or_else(|| inconnu(tok))?;
                let x = depile(&mut pile)?;
                pile.push(op.appliquer(x)?);
            }

            Genre::Binaire => {
                let op = registre.binaire(&tok.texte).ok_or_else(|| inconnu(tok))?;
                let b = depile(&mut pile)?;
                let a = depile(&mut pile)?;
                pile.push(op.appliquer(a, b)?);
            }

            Genre::Appel(n) => {
                let f = registre.fonction(&tok.texte).ok_or_else(|| inconnu(tok))?;
                if let Arite::Exacte(attendu) = f.arite {
                    if attendu != n {
                        return Err(ErreurCalcul::ArityMismatch {
                            nom: tok.texte.clone(),
                            attendu,
                            recu: n,
                        });
                    }
                }
                let debut = pile
                    .len()
                    .checked_sub(n)
                    .ok_or(ErreurCalcul::MissingOperand)?;
                let args = pile.split_off(debut);
                pile.push(f.appeler(&tok.texte, &args)?);
            }

            Genre::ParOuvrante | Genre::ParFermante | Genre::Fonction => {
                return Err(ErreurCalcul::MalformedExpression);
            }
        }

        trace!(jeton = %tok, pile = pile.len(), "pas");
    }

    match pile.as_slice() {
        [r] => Ok(*r),
        _ => Err(ErreurCalcul::MalformedExpression),
    }
}

/// Expression saisie : texte non vide, sans blancs, évaluée contre un registre.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    texte: String,
}

impl Expression {
    pub fn new(texte: &str) -> Result<Self, ErreurCalcul> {
        let texte: String = texte.chars().filter(|c| !c.is_whitespace()).collect();
        if texte.is_empty() {
            return Err(ErreurCalcul::EmptyExpression);
        }
        Ok(Self { texte })
    }

    pub fn texte(&self) -> &str {
        &self.texte
    }

    /// Jetons puis RPN (sans évaluer).
    pub fn compiler(&self, registre: &Registre) -> Result<(Vec<Tok>, Vec<Tok>), ErreurCalcul> {
        let jetons = tokenize(&self.texte, registre)?;
        debug!(jetons = %format_tokens(&jetons), "jetons");
        let rpn = to_rpn(&jetons, registre)?;
        Ok((jetons, rpn))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(texte = %self.texte))]
    pub fn evaluer(&self, registre: &Registre) -> Result<Rationnel, ErreurCalcul> {
        let (_jetons, rpn) = self.compiler(registre)?;
        let r = eval_rpn(&rpn, registre)?;
        debug!(resultat = %r, "évaluée");
        Ok(r)
    }

    /// Évalue et garde la démarche (jetons, RPN, fraction, lecture décimale).
    pub fn evaluer_avec_demarche(
        &self,
        registre: &Registre,
        reglages: &Reglages,
    ) -> Result<(Rationnel, Demarche), ErreurCalcul> {
        let (jetons, rpn) = self.compiler(registre)?;
        let r = eval_rpn(&rpn, registre)?;

        let d = Demarche {
            jetons: format_tokens(&jetons),
            rpn: format_tokens(&rpn),
            exact: r.to_string(),
            lecture: vers_decimal(&r, reglages.chiffres),
        };
        Ok((r, d))
    }
}

/// API publique : évalue une expression avec le registre par défaut.
pub fn eval_expression(expr_str: &str) -> Result<Rationnel, ErreurCalcul> {
    Expression::new(expr_str)?.evaluer(registre_global())
}
