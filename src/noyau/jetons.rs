// src/noyau/jetons.rs
//
// Texte -> jetons typés.
// - nombres : chiffres + un séparateur au plus ('.' ou ',', normalisé en '.')
// - noms : suite de lettres, en minuscules, classée par le registre
// - tout autre caractère : un jeton à lui seul
// Les blancs sont retirés avant le découpage ("1 2" = 12, "s in(0)" = sin(0)) ;
// les positions comptent donc les caractères du texte sans blancs.
// La virgule sépare les arguments seulement dans les parenthèses d’un appel de fonction :
// ailleurs c’est un séparateur décimal ("1,5+1" = 2.5, "min(1,2)" = 1).

use std::fmt;

use super::erreur::ErreurCalcul;
use super::registre::Registre;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Genre {
    Nombre,
    Virgule,
    ParOuvrante,
    ParFermante,
    Unaire,
    Binaire,
    Fonction,
    /// Produit par to_rpn : fonction liée à son nombre d’arguments.
    Appel(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tok {
    pub genre: Genre,
    /// Texte d’origine (normalisé) : sert à retrouver l’opération par son nom.
    pub texte: String,
    /// Position (en caractères) dans l’expression.
    pub position: usize,
}

impl Tok {
    pub fn new(genre: Genre, texte: impl Into<String>, position: usize) -> Self {
        Self {
            genre,
            texte: texte.into(),
            position,
        }
    }

    /// Un jeton après lequel un opérateur est binaire.
    fn termine_valeur(&self) -> bool {
        matches!(self.genre, Genre::Nombre | Genre::ParFermante)
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.genre {
            Genre::Unaire => write!(f, "{}u", self.texte),
            Genre::Appel(n) => write!(f, "{}/{}", self.texte, n),
            _ => f.write_str(&self.texte),
        }
    }
}

/// Contrôle des parenthèses avant tout découpage.
fn verifie_parentheses(chars: &[char]) -> Result<(), ErreurCalcul> {
    let mut profondeur: usize = 0;
    for &c in chars {
        match c {
            '(' => profondeur += 1,
            ')' => {
                profondeur = profondeur
                    .checked_sub(1)
                    .ok_or(ErreurCalcul::UnbalancedBrackets)?;
            }
            _ => {}
        }
    }
    if profondeur != 0 {
        return Err(ErreurCalcul::UnbalancedBrackets);
    }
    Ok(())
}

fn est_separateur(c: char) -> bool {
    c == '.' || c == ','
}

/// Classe un nom (ou symbole) selon le registre et le jeton précédent.
fn classe(
    nom: &str,
    position: usize,
    precedent: Option<&Tok>,
    suivant: Option<char>,
    registre: &Registre,
) -> Result<Genre, ErreurCalcul> {
    if registre.est_fonction(nom) {
        if suivant != Some('(') {
            return Err(ErreurCalcul::ExpectedOpenParen {
                nom: nom.to_string(),
            });
        }
        return Ok(Genre::Fonction);
    }

    let apres_valeur = precedent.is_some_and(Tok::termine_valeur);
    match (registre.est_unaire(nom), registre.est_binaire(nom)) {
        (true, true) if apres_valeur => Ok(Genre::Binaire),
        (true, _) => Ok(Genre::Unaire),
        (false, true) => Ok(Genre::Binaire),
        (false, false) => Err(ErreurCalcul::inattendu(nom, position)),
    }
}

/// Tokenize une expression.
///
/// Exemples (registre par défaut) :
/// - "2*-3"      -> 2 * -u 3
/// - "3.21e2"    -> 3.21 e 2
/// - "min(1,-2)" -> min ( 1 , -u 2 )   (si min est enregistrée)
pub fn tokenize(s: &str, registre: &Registre) -> Result<Vec<Tok>, ErreurCalcul> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(ErreurCalcul::EmptyExpression);
    }
    verifie_parentheses(&chars)?;

    let mut out: Vec<Tok> = Vec::new();
    // une entrée par parenthèse ouverte : true si c’est celle d’un appel de fonction
    let mut appels: Vec<bool> = Vec::new();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];
        let dans_appel = appels.last().copied().unwrap_or(false);

        // Parenthèses
        if c == '(' {
            appels.push(matches!(out.last(), Some(t) if t.genre == Genre::Fonction));
            out.push(Tok::new(Genre::ParOuvrante, "(", i));
            i += 1;
            continue;
        }
        if c == ')' {
            appels.pop();
            out.push(Tok::new(Genre::ParFermante, ")", i));
            i += 1;
            continue;
        }

        // Séparateur d’arguments
        if c == ',' && dans_appel {
            out.push(Tok::new(Genre::Virgule, ",", i));
            i += 1;
            continue;
        }

        // Nombre : chiffres + séparateur(s) ; dans un appel, ',' arrête le nombre
        if c.is_ascii_digit() || est_separateur(c) {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_digit()
                    || chars[i] == '.'
                    || (chars[i] == ',' && !dans_appel))
            {
                i += 1;
            }
            let brut: String = chars[start..i].iter().collect();
            if brut.chars().filter(|&c| est_separateur(c)).count() > 1 {
                return Err(ErreurCalcul::MalformedNumber(brut));
            }
            out.push(Tok::new(Genre::Nombre, brut.replace(',', "."), start));
            continue;
        }

        // Nom : suite de lettres (insensible à la casse)
        let start = i;
        if c.is_alphabetic() {
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
        } else {
            i += 1;
        }
        let nom: String = chars[start..i].iter().collect::<String>().to_lowercase();

        let genre = classe(&nom, start, out.last(), chars.get(i).copied(), registre)?;
        out.push(Tok::new(genre, nom, start));
    }

    Ok(out)
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
