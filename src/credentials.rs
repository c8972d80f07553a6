//! Encrypted database credentials and the interactive `.env` wizard.
//!
//! `SECRET_KEY` holds 32 random bytes as hex. The same bytes, URL-safe base64
//! encoded, form the Fernet key that encrypts `DB_PASSWORD`. The stored
//! password is the Fernet token, URL-safe base64 encoded once more.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use fernet::Fernet;
use thiserror::Error;

pub const SUPPORTED_DRIVERS: &[&str] = &["postgres"];

const SECRET_LEN: usize = 32;
const DEFAULT_DRIVER: &str = "postgres";
const DEFAULT_DB: &str = "localhost:5432/stock";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("SECRET_KEY must be {} hex encoded bytes", SECRET_LEN)]
    InvalidSecretKey,

    #[error("Stored password cannot be decrypted with this SECRET_KEY")]
    Decrypt,

    #[error("Cannot read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The 32 byte secret behind `SECRET_KEY`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; SECRET_LEN]);

impl SecretKey {
    pub fn generate() -> Result<Self, CredentialsError> {
        // A fresh Fernet key is 32 random bytes, base64 encoded.
        let raw = URL_SAFE
            .decode(Fernet::generate_key())
            .map_err(|_| CredentialsError::InvalidSecretKey)?;
        let bytes: [u8; SECRET_LEN] = raw
            .try_into()
            .map_err(|_| CredentialsError::InvalidSecretKey)?;
        Ok(SecretKey(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CredentialsError> {
        let raw = hex::decode(s.trim()).map_err(|_| CredentialsError::InvalidSecretKey)?;
        let bytes: [u8; SECRET_LEN] = raw
            .try_into()
            .map_err(|_| CredentialsError::InvalidSecretKey)?;
        Ok(SecretKey(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn cipher(&self) -> Result<PasswordCipher, CredentialsError> {
        let fernet =
            Fernet::new(&URL_SAFE.encode(self.0)).ok_or(CredentialsError::InvalidSecretKey)?;
        Ok(PasswordCipher { fernet })
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

pub struct PasswordCipher {
    fernet: Fernet,
}

impl PasswordCipher {
    pub fn encrypt(&self, plain: &str) -> String {
        let token = self.fernet.encrypt(plain.as_bytes());
        URL_SAFE.encode(token)
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, CredentialsError> {
        let token = URL_SAFE
            .decode(stored.trim())
            .map_err(|_| CredentialsError::Decrypt)?;
        let token = String::from_utf8(token).map_err(|_| CredentialsError::Decrypt)?;
        let plain = self
            .fernet
            .decrypt(&token)
            .map_err(|_| CredentialsError::Decrypt)?;
        String::from_utf8(plain).map_err(|_| CredentialsError::Decrypt)
    }
}

// ── Wizard ───────────────────────────────────────────────────────────────────

/// Source of answers for the wizard. A blank answer keeps the default.
pub trait Prompter {
    fn ask(&mut self, label: &str, default: &str) -> io::Result<String>;

    /// Reads without echo.
    fn ask_secret(&mut self, label: &str) -> io::Result<String>;

    fn say(&mut self, message: &str) -> io::Result<()>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str, default: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        if default.is_empty() {
            write!(stdout, "{}: ", label)?;
        } else {
            write!(stdout, "{} ({}): ", label, default)?;
        }
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(format!("{}: ", label))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        println!("{}", message);
        Ok(())
    }
}

fn answer_or(answer: String, default: &str) -> String {
    if answer.is_empty() {
        default.to_string()
    } else {
        answer
    }
}

fn previous_value<'a>(existing: &'a HashMap<String, String>, key: &str) -> &'a str {
    existing.get(key).map(String::as_str).unwrap_or_default()
}

/// Asks for the connection settings and returns the `.env` entries in the
/// order they are written. Values in `existing` are offered as defaults.
pub fn run_wizard<P: Prompter + ?Sized>(
    existing: &HashMap<String, String>,
    prompter: &mut P,
) -> Result<Vec<(&'static str, String)>, CredentialsError> {
    prompter.say("Change settings, blank keeps the value in parentheses")?;

    let (secret, kept_secret) = match existing.get("SECRET_KEY") {
        Some(hex) if !hex.is_empty() => (SecretKey::from_hex(hex)?, true),
        _ => (SecretKey::generate()?, false),
    };
    let cipher = secret.cipher()?;

    let old_password = match existing.get("DB_PASSWORD") {
        Some(stored) if kept_secret && !stored.is_empty() => cipher.decrypt(stored)?,
        Some(stored) if !stored.is_empty() => {
            prompter.say("New SECRET_KEY generated, the stored password is discarded")?;
            String::new()
        }
        _ => String::new(),
    };

    prompter.say("Setting database connection")?;

    let driver_default = match previous_value(existing, "DRIVER") {
        "" => DEFAULT_DRIVER,
        d => d,
    };
    let driver = loop {
        let label = format!("Select db driver [{}]", SUPPORTED_DRIVERS.join("/"));
        let answer = answer_or(prompter.ask(&label, driver_default)?, driver_default);
        if SUPPORTED_DRIVERS.contains(&answer.as_str()) {
            break answer;
        }
        prompter.say(&format!("Unsupported driver '{}'", answer))?;
    };

    let db_default = match previous_value(existing, "DB") {
        "" => DEFAULT_DB,
        d => d,
    };
    let db = answer_or(prompter.ask("host:port/db", db_default)?, db_default);
    let user_default = previous_value(existing, "DB_USER");
    let user = answer_or(prompter.ask("user", user_default)?, user_default);
    let password = answer_or(prompter.ask_secret("password")?, &old_password);

    Ok(vec![
        ("SECRET_KEY", secret.to_hex()),
        ("DRIVER", driver),
        ("DB", db),
        ("DB_USER", user),
        ("DB_PASSWORD", cipher.encrypt(&password)),
    ])
}

/// Reads `path` as a dotenv file. A missing file yields no entries.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, CredentialsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let mut values = HashMap::new();
    for entry in dotenvy::from_path_iter(path)? {
        let (key, value) = entry?;
        values.insert(key, value);
    }
    Ok(values)
}

fn quote(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{}\"", escaped)
}

/// One `KEY='value'` line per entry.
pub fn render_env(values: &[(&str, String)]) -> String {
    values
        .iter()
        .map(|(k, v)| format!("{}={}\n", k, quote(v)))
        .collect()
}

pub fn write_env_file(path: &Path, values: &[(&str, String)]) -> Result<(), CredentialsError> {
    std::fs::write(path, render_env(values))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Replays canned answers and records what was shown.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<String>,
        secrets: VecDeque<String>,
        asked: Vec<(String, String)>,
        said: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&str], secrets: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|s| s.to_string()).collect(),
                secrets: secrets.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, label: &str, default: &str) -> io::Result<String> {
            self.asked.push((label.to_string(), default.to_string()));
            self.answers
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more answers"))
        }

        fn ask_secret(&mut self, _label: &str) -> io::Result<String> {
            self.secrets
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more secrets"))
        }

        fn say(&mut self, message: &str) -> io::Result<()> {
            self.said.push(message.to_string());
            Ok(())
        }
    }

    fn as_map(values: &[(&str, String)]) -> HashMap<String, String> {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn secret_key_hex_roundtrip() {
        let key = SecretKey::generate().expect("key");
        let hex = key.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(SecretKey::from_hex(&hex).expect("valid hex"), key);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(SecretKey::generate().expect("key"), SecretKey::generate().expect("key"));
    }

    #[test]
    fn secret_key_rejects_wrong_length_and_garbage() {
        assert!(SecretKey::from_hex("abcd").is_err());
        assert!(SecretKey::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn password_survives_encryption() {
        let cipher = SecretKey::generate().expect("key").cipher().expect("cipher");
        let stored = cipher.encrypt("s3cret!");
        assert_ne!(stored, "s3cret!");
        assert_eq!(cipher.decrypt(&stored).expect("decrypt"), "s3cret!");
    }

    #[test]
    fn stored_password_is_base64_of_a_fernet_token() {
        let key = SecretKey::generate().expect("key");
        let stored = key.cipher().expect("cipher").encrypt("pw");
        let token = String::from_utf8(URL_SAFE.decode(&stored).expect("base64")).expect("utf8");
        let fernet = Fernet::new(&URL_SAFE.encode(key.0)).expect("fernet key");
        assert_eq!(fernet.decrypt(&token).expect("token"), b"pw");
    }

    #[test]
    fn decrypt_with_other_key_fails() {
        let stored = SecretKey::generate().expect("key").cipher().expect("cipher").encrypt("pw");
        let other = SecretKey::generate().expect("key").cipher().expect("cipher");
        assert!(matches!(other.decrypt(&stored), Err(CredentialsError::Decrypt)));
    }

    #[test]
    fn wizard_on_empty_env_generates_key_and_encrypts_password() {
        let mut prompter = ScriptedPrompter::new(&["", "db.local:5432/stock", "stock"], &["pw1"]);
        let values = run_wizard(&HashMap::new(), &mut prompter).expect("wizard");

        let keys: Vec<&str> = values.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["SECRET_KEY", "DRIVER", "DB", "DB_USER", "DB_PASSWORD"]);

        let map = as_map(&values);
        assert_eq!(map["DRIVER"], "postgres");
        assert_eq!(map["DB"], "db.local:5432/stock");
        assert_eq!(map["DB_USER"], "stock");
        let cipher = SecretKey::from_hex(&map["SECRET_KEY"])
            .expect("key")
            .cipher()
            .expect("cipher");
        assert_eq!(cipher.decrypt(&map["DB_PASSWORD"]).expect("decrypt"), "pw1");
    }

    #[test]
    fn wizard_blank_answers_keep_previous_values() {
        let key = SecretKey::generate().expect("key");
        let cipher = key.cipher().expect("cipher");
        let mut existing = HashMap::new();
        existing.insert("SECRET_KEY".to_string(), key.to_hex());
        existing.insert("DRIVER".to_string(), "postgres".to_string());
        existing.insert("DB".to_string(), "old:5432/db".to_string());
        existing.insert("DB_USER".to_string(), "alice".to_string());
        existing.insert("DB_PASSWORD".to_string(), cipher.encrypt("old-pw"));

        let mut prompter = ScriptedPrompter::new(&["", "", ""], &[""]);
        let map = as_map(&run_wizard(&existing, &mut prompter).expect("wizard"));

        assert_eq!(map["SECRET_KEY"], key.to_hex());
        assert_eq!(map["DB"], "old:5432/db");
        assert_eq!(map["DB_USER"], "alice");
        assert_eq!(cipher.decrypt(&map["DB_PASSWORD"]).expect("decrypt"), "old-pw");
        assert!(prompter
            .asked
            .iter()
            .any(|(label, default)| label == "user" && default == "alice"));
    }

    #[test]
    fn wizard_asks_again_for_unsupported_driver() {
        let mut prompter = ScriptedPrompter::new(&["mysql", "postgres", "", "u"], &["p"]);
        let map = as_map(&run_wizard(&HashMap::new(), &mut prompter).expect("wizard"));
        assert_eq!(map["DRIVER"], "postgres");
        assert!(prompter.said.iter().any(|m| m.contains("'mysql'")));
    }

    #[test]
    fn wizard_rejects_password_encrypted_with_another_key() {
        let mut existing = HashMap::new();
        existing.insert("SECRET_KEY".to_string(), SecretKey::generate().expect("key").to_hex());
        existing.insert(
            "DB_PASSWORD".to_string(),
            SecretKey::generate().expect("key").cipher().expect("cipher").encrypt("x"),
        );
        let mut prompter = ScriptedPrompter::new(&["", "", ""], &[""]);
        assert!(matches!(
            run_wizard(&existing, &mut prompter),
            Err(CredentialsError::Decrypt)
        ));
    }

    #[test]
    fn render_quotes_every_value() {
        let out = render_env(&[("A", "x".to_string()), ("B", "it's".to_string())]);
        assert_eq!(out, "A='x'\nB=\"it's\"\n");
    }

    #[test]
    fn rendered_file_reads_back() {
        let dir = std::env::temp_dir().join(format!("stock-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join(".env");
        let values = vec![
            ("SECRET_KEY", SecretKey::generate().expect("key").to_hex()),
            ("DB", "localhost:5432/stock".to_string()),
            ("DB_USER", "o'brien".to_string()),
        ];

        write_env_file(&path, &values).expect("write");
        let read = read_env_file(&path).expect("read");
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(read, as_map(&values));
    }

    #[test]
    fn missing_env_file_is_empty() {
        let read = read_env_file(Path::new("/nonexistent/stock/.env")).expect("read");
        assert!(read.is_empty());
    }
}
