//! Format-Validierung fuer Registrierungsfelder

use regex::Regex;

/// Prueft E-Mail- und Telefonnummern-Formate
///
/// Die Regexes werden einmal im Konstruktor kompiliert.
pub struct Validierung {
    email: Regex,
    telefon: Regex,
}

impl Validierung {
    /// Erstellt eine neue Validierung mit kompilierten Mustern
    pub fn neu() -> Self {
        Self {
            email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("E-Mail-Regex ungueltig"),
            // Optionales fuehrendes +, Ziffern mit ueblichen Trennzeichen
            telefon: Regex::new(r"^\+?[0-9][0-9 ().\-]{4,22}[0-9]$")
                .expect("Telefon-Regex ungueltig"),
        }
    }

    /// Gibt `true` zurueck wenn die E-Mail-Adresse gueltig aussieht
    pub fn ist_gueltige_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    /// Gibt `true` zurueck wenn die Telefonnummer gueltig aussieht
    pub fn ist_gueltige_telefonnummer(&self, telefon: &str) -> bool {
        self.telefon.is_match(telefon)
    }
}

impl Default for Validierung {
    fn default() -> Self {
        Self::neu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gueltige_emails() {
        let v = Validierung::neu();
        assert!(v.ist_gueltige_email("alice@example.com"));
        assert!(v.ist_gueltige_email("a.b+c@sub.example.org"));
    }

    #[test]
    fn ungueltige_emails() {
        let v = Validierung::neu();
        assert!(!v.ist_gueltige_email(""));
        assert!(!v.ist_gueltige_email("keine-email"));
        assert!(!v.ist_gueltige_email("zwei@@example.com"));
        assert!(!v.ist_gueltige_email("leerzeichen @example.com"));
        assert!(!v.ist_gueltige_email("ohne@punkt"));
    }

    #[test]
    fn gueltige_telefonnummern() {
        let v = Validierung::neu();
        assert!(v.ist_gueltige_telefonnummer("+15551234567"));
        assert!(v.ist_gueltige_telefonnummer("+49 151 1234567"));
        assert!(v.ist_gueltige_telefonnummer("030-1234567"));
        assert!(v.ist_gueltige_telefonnummer("(030) 123456"));
    }

    #[test]
    fn ungueltige_telefonnummern() {
        let v = Validierung::neu();
        assert!(!v.ist_gueltige_telefonnummer(""));
        assert!(!v.ist_gueltige_telefonnummer("abc"));
        assert!(!v.ist_gueltige_telefonnummer("123"));
        assert!(!v.ist_gueltige_telefonnummer("+"));
    }
}
