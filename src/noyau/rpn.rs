// src/noyau/rpn.rs
//
// Shunting-yard : jetons infixes -> RPN (postfix).
//
// Règles:
// - Nombre, Virgule : sortie directe.
// - '(' , Unaire, Fonction : empilés.
// - ')' : dépile jusqu’à '(' ; si une fonction est au sommet, elle sort en Appel(n)
//   (n = nombre d’arguments compté entre ses parenthèses).
// - Binaire : dépile les unaires de priorité >= et les binaires de priorité >=
//   (> si l’entrant est associatif à droite), puis empile.
//
// NOTE: avec le registre par défaut un unaire (4) passe avant tout binaire : -4^2 = 16.

use tracing::debug;

use super::erreur::ErreurCalcul;
use super::jetons::{format_tokens, Genre, Tok};
use super::registre::{Associativite, Registre};

/// Parenthèse ouverte en cours : compte des arguments d’un appel.
struct Cadre {
    appel: bool,
    virgules: usize,
    /// Un jeton a été vu depuis '(' ou la dernière virgule.
    argument_non_vide: bool,
    /// Un jeton a été vu depuis '('.
    contenu: bool,
}

impl Cadre {
    fn new(appel: bool) -> Self {
        Self {
            appel,
            virgules: 0,
            argument_non_vide: false,
            contenu: false,
        }
    }

    fn note_jeton(&mut self) {
        self.argument_non_vide = true;
        self.contenu = true;
    }
}

fn inconnu(tok: &Tok) -> ErreurCalcul {
    ErreurCalcul::inattendu(tok.texte.clone(), tok.position)
}

/// Priorité d’un opérateur en attente (None : '(' ou fonction, qui bloquent le dépilement).
fn priorite_en_attente(tok: &Tok, registre: &Registre) -> Result<Option<i32>, ErreurCalcul> {
    match tok.genre {
        Genre::Unaire => registre
            .unaire(&tok.texte)
            .map(|op| Some(op.priorite))
            .ok_or_else(|| inconnu(tok)),
        Genre::Binaire => registre
            .binaire(&tok.texte)
            .map(|op| Some(op.priorite))
            .ok_or_else(|| inconnu(tok)),
        _ => Ok(None),
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [min ( 1 + 2 , 3 )]
///   rpn:    [1 2 + , 3 min/2]
pub fn to_rpn(tokens: &[Tok], registre: &Registre) -> Result<Vec<Tok>, ErreurCalcul> {
    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Tok> = Vec::new();
    let mut cadres: Vec<Cadre> = Vec::new();

    for (k, tok) in tokens.iter().enumerate() {
        if !matches!(tok.genre, Genre::ParFermante | Genre::Virgule) {
            if let Some(c) = cadres.last_mut() {
                c.note_jeton();
            }
        }

        match tok.genre {
            Genre::Nombre => out.push(tok.clone()),

            Genre::Virgule => {
                // l’argument qui se termine sort en entier avant la virgule
                while let Some(top) = ops.last() {
                    if top.genre == Genre::ParOuvrante {
                        break;
                    }
                    out.extend(ops.pop());
                }

                let cadre = cadres
                    .last_mut()
                    .filter(|c| c.appel)
                    .ok_or(ErreurCalcul::MalformedExpression)?;
                if !cadre.argument_non_vide {
                    return Err(ErreurCalcul::MissingOperand);
                }
                cadre.virgules += 1;
                cadre.argument_non_vide = false;
                out.push(tok.clone());
            }

            Genre::ParOuvrante => {
                let appel = k > 0 && tokens[k - 1].genre == Genre::Fonction;
                cadres.push(Cadre::new(appel));
                ops.push(tok.clone());
            }

            Genre::Unaire | Genre::Fonction => ops.push(tok.clone()),

            Genre::ParFermante => {
                // dépile jusqu’à '('
                loop {
                    match ops.pop() {
                        Some(top) if top.genre == Genre::ParOuvrante => break,
                        Some(top) => out.push(top),
                        None => return Err(ErreurCalcul::UnbalancedBrackets),
                    }
                }
                let cadre = cadres.pop().ok_or(ErreurCalcul::UnbalancedBrackets)?;

                // fonction au sommet : elle sort liée à son nombre d’arguments
                if matches!(ops.last(), Some(t) if t.genre == Genre::Fonction) {
                    if let Some(f) = ops.pop() {
                        if cadre.virgules > 0 && !cadre.argument_non_vide {
                            return Err(ErreurCalcul::MissingOperand);
                        }
                        let n = if cadre.contenu { cadre.virgules + 1 } else { 0 };
                        out.push(Tok::new(Genre::Appel(n), f.texte, f.position));
                    }
                }
            }

            Genre::Binaire => {
                let op = registre.binaire(&tok.texte).ok_or_else(|| inconnu(tok))?;
                let droite = op.associativite == Associativite::Droite;

                while let Some(top) = ops.last() {
                    let Some(p_top) = priorite_en_attente(top, registre)? else {
                        break;
                    };
                    let doit_pop = if top.genre == Genre::Binaire && droite {
                        p_top > op.priorite
                    } else {
                        p_top >= op.priorite
                    };

                    if !doit_pop {
                        break;
                    }
                    out.extend(ops.pop());
                }

                ops.push(tok.clone());
            }

            Genre::Appel(_) => return Err(ErreurCalcul::MalformedExpression),
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op.genre {
            Genre::ParOuvrante => return Err(ErreurCalcul::UnbalancedBrackets),
            Genre::Fonction => return Err(ErreurCalcul::ExpectedOpenParen { nom: op.texte }),
            _ => out.push(op),
        }
    }

    debug!(rpn = %format_tokens(&out), "RPN");
    Ok(out)
}
