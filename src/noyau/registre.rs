// src/noyau/registre.rs
//
// Registre des opérations : nom -> descripteur typé.
// - Un nom est soit un opérateur (unaire et/ou binaire), soit une fonction, jamais les deux :
//   l’enum Entree rend la règle structurelle.
// - Valeur explicite, construite par l’hôte puis passée par référence à
//   tokenize / to_rpn / eval_rpn. Mutation seulement via &mut (ajouter_*).
// - registre_global() : table par défaut, initialisée une fois, jamais modifiée.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::OnceLock;

use tracing::warn;

use super::erreur::ErreurCalcul;
use super::rationnel::Rationnel;
use super::reglages::Reglages;

pub type FnUnaire = Box<dyn Fn(Rationnel) -> Result<Rationnel, ErreurCalcul> + Send + Sync>;
pub type FnBinaire =
    Box<dyn Fn(Rationnel, Rationnel) -> Result<Rationnel, ErreurCalcul> + Send + Sync>;
pub type FnFonction = Box<dyn Fn(&[Rationnel]) -> Result<Rationnel, ErreurCalcul> + Send + Sync>;

/// Priorités des opérations par défaut.
pub const PRIORITE_ADDITIVE: i32 = 1;
pub const PRIORITE_MULTIPLICATIVE: i32 = 2;
pub const PRIORITE_PUISSANCE: i32 = 3;
/// Au-dessus de tout binaire par défaut : un unaire est toujours dépilé avant.
pub const PRIORITE_UNAIRE: i32 = 4;
pub const PRIORITE_FONCTION: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Associativite {
    Gauche,
    Droite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arite {
    Exacte(usize),
    Variable,
}

pub struct OpUnaire {
    pub priorite: i32,
    f: FnUnaire,
}

pub struct OpBinaire {
    pub priorite: i32,
    pub associativite: Associativite,
    f: FnBinaire,
}

pub struct Fonction {
    pub priorite: i32,
    pub arite: Arite,
    f: FnFonction,
}

impl OpUnaire {
    pub fn appliquer(&self, x: Rationnel) -> Result<Rationnel, ErreurCalcul> {
        (self.f)(x)
    }
}

impl OpBinaire {
    pub fn appliquer(&self, a: Rationnel, b: Rationnel) -> Result<Rationnel, ErreurCalcul> {
        (self.f)(a, b)
    }
}

impl Fonction {
    /// Appel avec contrôle d’arité (les implémentations peuvent indexer `args` sans risque).
    pub fn appeler(&self, nom: &str, args: &[Rationnel]) -> Result<Rationnel, ErreurCalcul> {
        if let Arite::Exacte(attendu) = self.arite {
            if attendu != args.len() {
                return Err(ErreurCalcul::ArityMismatch {
                    nom: nom.to_string(),
                    attendu,
                    recu: args.len(),
                });
            }
        }
        (self.f)(args)
    }
}

enum Entree {
    Operateur {
        unaire: Option<OpUnaire>,
        binaire: Option<OpBinaire>,
    },
    Fonction(Fonction),
}

pub struct Registre {
    table: HashMap<String, Entree>,
}

impl fmt::Debug for Registre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registre").field("noms", &self.noms()).finish()
    }
}

/* ------------------------ Noms ------------------------ */

/// Un nom doit pouvoir sortir du tokenizer :
/// - suite de lettres (normalisée en minuscules)
/// - ou un symbole seul (ni lettre, ni chiffre, ni espace, ni parenthèse, ni séparateur)
fn normalise_nom(nom: &str) -> Result<String, ErreurCalcul> {
    let mut chars = nom.chars();
    let valide = match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) if !c.is_alphabetic() => {
            !(c.is_numeric() || c.is_whitespace() || matches!(c, '(' | ')' | ',' | '.'))
        }
        _ => nom.chars().all(char::is_alphabetic),
    };

    if !valide {
        return Err(ErreurCalcul::inattendu(nom, 0));
    }
    Ok(nom.to_lowercase())
}

fn refus(nom: &str, e: ErreurCalcul) -> Result<(), ErreurCalcul> {
    warn!(nom, erreur = %e, "enregistrement refusé");
    Err(e)
}

/* ------------------------ Fonctions par défaut ------------------------ */

/// Fonction réelle évaluée en flottant (conversion explicite aller/retour).
fn transcendante(
    nom: &'static str,
    f: fn(f64) -> f64,
) -> impl Fn(&[Rationnel]) -> Result<Rationnel, ErreurCalcul> + Send + Sync {
    move |args: &[Rationnel]| {
        let x = args[0];
        Rationnel::from_f64(f(x.to_f64())).map_err(|e| match e {
            ErreurCalcul::DomainError(_) => {
                ErreurCalcul::DomainError(format!("{nom}({}) n’a pas de valeur réelle", x))
            }
            autre => autre,
        })
    }
}

fn cotangente(args: &[Rationnel]) -> Result<Rationnel, ErreurCalcul> {
    let x = args[0].to_f64();
    let s = x.sin();
    if s == 0.0 {
        return Err(ErreurCalcul::DivisionByZero);
    }
    Rationnel::from_f64(x.cos() / s)
}

fn arc_cotangente(x: f64) -> f64 {
    FRAC_PI_2 - x.atan()
}

/* ------------------------ Registre ------------------------ */

impl Registre {
    /// Aucun opérateur, aucune fonction.
    pub fn vide() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// + - * / ^ e (binaires), + - (unaires), fonctions usuelles d’arité 1.
    pub fn par_defaut() -> Self {
        Self::avec_reglages(&Reglages::default())
    }

    pub fn avec_reglages(reglages: &Reglages) -> Self {
        use Associativite::Gauche;

        let mut r = Self::vide();

        r.pose_binaire(
            "+",
            PRIORITE_ADDITIVE,
            Gauche,
            Box::new(|a: Rationnel, b| a.checked_add(b)),
        );
        r.pose_binaire(
            "-",
            PRIORITE_ADDITIVE,
            Gauche,
            Box::new(|a: Rationnel, b| a.checked_sub(b)),
        );
        r.pose_binaire(
            "*",
            PRIORITE_MULTIPLICATIVE,
            Gauche,
            Box::new(|a: Rationnel, b| a.checked_mul(b)),
        );
        r.pose_binaire(
            "/",
            PRIORITE_MULTIPLICATIVE,
            Gauche,
            Box::new(|a: Rationnel, b| a.checked_div(b)),
        );
        r.pose_binaire(
            "^",
            PRIORITE_PUISSANCE,
            reglages.associativite_puissance,
            Box::new(|a: Rationnel, b| a.puissance(b)),
        );
        // a e b = a·10^b (3.21e2 se lit 3.21 e 2)
        r.pose_binaire(
            "e",
            PRIORITE_PUISSANCE,
            Gauche,
            Box::new(|a: Rationnel, b| a.checked_mul(Rationnel::from_integer(10).puissance(b)?)),
        );

        r.pose_unaire("+", PRIORITE_UNAIRE, Box::new(|x: Rationnel| Ok(x)));
        r.pose_unaire("-", PRIORITE_UNAIRE, Box::new(|x: Rationnel| x.checked_neg()));

        let un = Arite::Exacte(1);
        let p = PRIORITE_FONCTION;

        r.pose_fonction("sin", p, un, Box::new(transcendante("sin", f64::sin)));
        r.pose_fonction("cos", p, un, Box::new(transcendante("cos", f64::cos)));
        for nom in ["tg", "tan"] {
            r.pose_fonction(nom, p, un, Box::new(transcendante("tan", f64::tan)));
        }
        r.pose_fonction("ctg", p, un, Box::new(cotangente));
        for nom in ["arcsin", "asin"] {
            r.pose_fonction(nom, p, un, Box::new(transcendante("arcsin", f64::asin)));
        }
        for nom in ["arccos", "acos"] {
            r.pose_fonction(nom, p, un, Box::new(transcendante("arccos", f64::acos)));
        }
        for nom in ["arctg", "arctan", "atg", "atan"] {
            r.pose_fonction(nom, p, un, Box::new(transcendante("arctan", f64::atan)));
        }
        for nom in ["arcctg", "actg"] {
            r.pose_fonction(nom, p, un, Box::new(transcendante("arcctg", arc_cotangente)));
        }
        r.pose_fonction("abs", p, un, Box::new(|args: &[Rationnel]| args[0].abs()));
        r.pose_fonction("int", p, un, Box::new(|args: &[Rationnel]| Ok(args[0].partie_entiere())));
        r.pose_fonction(
            "sqrt",
            p,
            un,
            Box::new(|args: &[Rationnel]| args[0].puissance(Rationnel::new(1, 2)?)),
        );

        r
    }

    /* ------------------------ Consultation ------------------------ */

    pub fn unaire(&self, nom: &str) -> Option<&OpUnaire> {
        match self.table.get(nom)? {
            Entree::Operateur { unaire, .. } => unaire.as_ref(),
            Entree::Fonction(_) => None,
        }
    }

    pub fn binaire(&self, nom: &str) -> Option<&OpBinaire> {
        match self.table.get(nom)? {
            Entree::Operateur { binaire, .. } => binaire.as_ref(),
            Entree::Fonction(_) => None,
        }
    }

    pub fn fonction(&self, nom: &str) -> Option<&Fonction> {
        match self.table.get(nom)? {
            Entree::Fonction(f) => Some(f),
            Entree::Operateur { .. } => None,
        }
    }

    pub fn est_unaire(&self, nom: &str) -> bool {
        self.unaire(nom).is_some()
    }

    pub fn est_binaire(&self, nom: &str) -> bool {
        self.binaire(nom).is_some()
    }

    pub fn est_fonction(&self, nom: &str) -> bool {
        self.fonction(nom).is_some()
    }

    /* ------------------------ Invocation par nom ------------------------ */

    pub fn appliquer_unaire(&self, nom: &str, x: Rationnel) -> Result<Rationnel, ErreurCalcul> {
        match self.unaire(nom) {
            Some(op) => op.appliquer(x),
            None => Err(ErreurCalcul::inattendu(nom, 0)),
        }
    }

    pub fn appliquer_binaire(
        &self,
        nom: &str,
        a: Rationnel,
        b: Rationnel,
    ) -> Result<Rationnel, ErreurCalcul> {
        match self.binaire(nom) {
            Some(op) => op.appliquer(a, b),
            None => Err(ErreurCalcul::inattendu(nom, 0)),
        }
    }

    pub fn appeler_fonction(
        &self,
        nom: &str,
        args: &[Rationnel],
    ) -> Result<Rationnel, ErreurCalcul> {
        match self.fonction(nom) {
            Some(f) => f.appeler(nom, args),
            None => Err(ErreurCalcul::inattendu(nom, 0)),
        }
    }

    /// Noms enregistrés, triés.
    pub fn noms(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.table.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }

    /* ------------------------ Enregistrement ------------------------ */

    pub fn ajouter_unaire<F>(&mut self, nom: &str, priorite: i32, f: F) -> Result<(), ErreurCalcul>
    where
        F: Fn(Rationnel) -> Result<Rationnel, ErreurCalcul> + Send + Sync + 'static,
    {
        let nom = normalise_nom(nom)?;
        let conflit = match self.table.get(&nom) {
            Some(Entree::Fonction(_)) => Some(ErreurCalcul::NameCollision(nom.clone())),
            Some(Entree::Operateur {
                unaire: Some(_), ..
            }) => Some(ErreurCalcul::DuplicateName(nom.clone())),
            _ => None,
        };
        if let Some(e) = conflit {
            return refus(&nom, e);
        }

        self.pose_unaire(&nom, priorite, Box::new(f));
        Ok(())
    }

    pub fn ajouter_binaire<F>(
        &mut self,
        nom: &str,
        priorite: i32,
        associativite: Associativite,
        f: F,
    ) -> Result<(), ErreurCalcul>
    where
        F: Fn(Rationnel, Rationnel) -> Result<Rationnel, ErreurCalcul> + Send + Sync + 'static,
    {
        let nom = normalise_nom(nom)?;
        let conflit = match self.table.get(&nom) {
            Some(Entree::Fonction(_)) => Some(ErreurCalcul::NameCollision(nom.clone())),
            Some(Entree::Operateur {
                binaire: Some(_), ..
            }) => Some(ErreurCalcul::DuplicateName(nom.clone())),
            _ => None,
        };
        if let Some(e) = conflit {
            return refus(&nom, e);
        }

        self.pose_binaire(&nom, priorite, associativite, Box::new(f));
        Ok(())
    }

    pub fn ajouter_fonction<F>(
        &mut self,
        nom: &str,
        priorite: i32,
        arite: Arite,
        f: F,
    ) -> Result<(), ErreurCalcul>
    where
        F: Fn(&[Rationnel]) -> Result<Rationnel, ErreurCalcul> + Send + Sync + 'static,
    {
        let nom = normalise_nom(nom)?;
        let conflit = match self.table.get(&nom) {
            Some(Entree::Fonction(_)) => Some(ErreurCalcul::DuplicateName(nom.clone())),
            Some(Entree::Operateur { .. }) => Some(ErreurCalcul::NameCollision(nom.clone())),
            None => None,
        };
        if let Some(e) = conflit {
            return refus(&nom, e);
        }

        self.pose_fonction(&nom, priorite, arite, Box::new(f));
        Ok(())
    }

    /* ------------------------ Insertion brute (noms déjà valides) ------------------------ */

    fn pose_unaire(&mut self, nom: &str, priorite: i32, f: FnUnaire) {
        let op = OpUnaire { priorite, f };
        match self.table.get_mut(nom) {
            Some(Entree::Operateur { unaire, .. }) => *unaire = Some(op),
            _ => {
                self.table.insert(
                    nom.to_string(),
                    Entree::Operateur {
                        unaire: Some(op),
                        binaire: None,
                    },
                );
            }
        }
    }

    fn pose_binaire(
        &mut self,
        nom: &str,
        priorite: i32,
        associativite: Associativite,
        f: FnBinaire,
    ) {
        let op = OpBinaire {
            priorite,
            associativite,
            f,
        };
        match self.table.get_mut(nom) {
            Some(Entree::Operateur { binaire, .. }) => *binaire = Some(op),
            _ => {
                self.table.insert(
                    nom.to_string(),
                    Entree::Operateur {
                        unaire: None,
                        binaire: Some(op),
                    },
                );
            }
        }
    }

    fn pose_fonction(&mut self, nom: &str, priorite: i32, arite: Arite, f: FnFonction) {
        self.table.insert(
            nom.to_string(),
            Entree::Fonction(Fonction { priorite, arite, f }),
        );
    }
}

impl Default for Registre {
    fn default() -> Self {
        Self::par_defaut()
    }
}

static REGISTRE_GLOBAL: OnceLock<Registre> = OnceLock::new();

/// Registre par défaut du processus (lecture seule, initialisé au premier accès).
pub fn registre_global() -> &'static Registre {
    REGISTRE_GLOBAL.get_or_init(Registre::par_defaut)
}
