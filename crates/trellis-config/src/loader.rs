//! Environment and dotenv loading.
//!
//! # Design
//! - `from_lookup` is the single parsing path; `from_env` only binds it to the process env.
//! - Blank values count as unset so `.env` templates with empty entries behave like omissions.
//! - Required identity variables fail fast, matching the behaviour of a misconfigured deploy.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, error, info};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    AppConfig, AssetsConfig, CorsConfig, Environment, IdentityConfig, LoggingSettings, MailConfig,
    SecurityConfig, ServerConfig,
};
use crate::validate::{parse_byte_size, parse_flag, parse_ip, parse_origins, parse_port, parse_url};

/// Load `.env` from the working directory into the process environment.
///
/// Existing variables are never overridden. Returns the path when a file was loaded.
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] when the file exists but cannot be parsed.
pub fn load_dotenv() -> ConfigResult<Option<PathBuf>> {
    let path = PathBuf::from(".env");
    Ok(load_dotenv_from(&path)?.then_some(path))
}

/// Load the given dotenv file into the process environment if it exists.
///
/// # Errors
///
/// Returns [`ConfigError::Dotenv`] when the file exists but cannot be parsed.
pub fn load_dotenv_from(path: &Path) -> ConfigResult<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            info!(path = %path.display(), "loaded dotenv file");
            Ok(true)
        }
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "no dotenv file present");
            Ok(false)
        }
        Err(source) => Err(ConfigError::Dotenv {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };
        let result = env.build();
        if let Err(err) = &result {
            error!(variable = err.var_name().unwrap_or("<none>"), error = %err, "configuration rejected");
        }
        result
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> ConfigResult<String> {
        self.optional(name)
            .ok_or(ConfigError::MissingVar { name })
    }

    fn build(&self) -> ConfigResult<AppConfig> {
        let environment = self
            .optional("APP_ENV")
            .map_or(Ok(Environment::default()), |value| value.parse())?;

        Ok(AppConfig {
            app_name: self
                .optional("APP_NAME")
                .unwrap_or_else(|| defaults::APP_NAME.to_string()),
            environment,
            server: self.server()?,
            cors: CorsConfig {
                allowed_origins: parse_origins("BASE_URL", self.optional("BASE_URL").as_deref())?,
            },
            security: SecurityConfig {
                enable_csp: parse_flag(self.optional("ENABLE_CSP").as_deref()),
                enable_hsts: environment.is_production(),
            },
            identity: self.identity()?,
            mail: self.mail()?,
            assets: self.assets()?,
            logging: LoggingSettings {
                level: self
                    .optional("LOG_LEVEL")
                    .unwrap_or_else(|| defaults::LOG_LEVEL.to_string()),
                format: self.optional("LOG_FORMAT"),
            },
            openapi_path: self.optional("OPENAPI_PATH").map(PathBuf::from),
        })
    }

    fn server(&self) -> ConfigResult<ServerConfig> {
        let bind_addr = parse_ip(
            "HOST",
            &self
                .optional("HOST")
                .unwrap_or_else(|| defaults::BIND_ADDR.to_string()),
        )?;
        let port = self
            .optional("PORT")
            .map_or(Ok(defaults::PORT), |value| parse_port("PORT", &value))?;
        let body_limit_bytes = self
            .optional("BODY_LIMIT_BYTES")
            .map_or(Ok(defaults::BODY_LIMIT_BYTES), |value| {
                parse_byte_size("BODY_LIMIT_BYTES", &value)
            })?;
        Ok(ServerConfig {
            bind_addr,
            port,
            body_limit_bytes,
        })
    }

    fn assets(&self) -> ConfigResult<AssetsConfig> {
        let static_root = self
            .optional("STATIC_ROOT")
            .map_or_else(|| PathBuf::from(defaults::STATIC_ROOT), PathBuf::from);
        let upload_dir = self
            .optional("UPLOAD_DIR")
            .map_or_else(|| PathBuf::from(defaults::UPLOAD_DIR), PathBuf::from);
        // Uploads are only reachable through the static mount.
        if !upload_dir.starts_with(&static_root) {
            return Err(ConfigError::InvalidVar {
                name: "UPLOAD_DIR",
                reason: "outside_static_root",
                value: Some(upload_dir.display().to_string()),
            });
        }
        Ok(AssetsConfig {
            static_root,
            upload_dir,
        })
    }

    fn identity(&self) -> ConfigResult<IdentityConfig> {
        let secret_key = SecretString::from(self.required("CLERK_SECRET_KEY")?);
        let jwt_public_key = self.required("CLERK_JWT_KEY")?.replace("\\n", "\n");
        if !jwt_public_key.contains("-----BEGIN") {
            return Err(ConfigError::InvalidVar {
                name: "CLERK_JWT_KEY",
                reason: "not_pem_encoded",
                value: None,
            });
        }
        let audience = self.required("API_URL")?;
        let api_base_url = parse_url(
            "CLERK_API_URL",
            &self
                .optional("CLERK_API_URL")
                .unwrap_or_else(|| defaults::IDENTITY_API_URL.to_string()),
        )?;
        Ok(IdentityConfig {
            secret_key,
            jwt_public_key,
            audience,
            api_base_url,
        })
    }

    fn mail(&self) -> ConfigResult<Option<MailConfig>> {
        let Some(host) = self.optional("EMAIL_HOST") else {
            return Ok(None);
        };
        let port = self
            .optional("EMAIL_PORT")
            .map_or(Ok(defaults::EMAIL_PORT), |value| {
                parse_port("EMAIL_PORT", &value)
            })?;
        Ok(Some(MailConfig {
            host,
            port,
            username: self.optional("EMAIL_USER"),
            password: self.optional("EMAIL_PASSWORD").map(SecretString::from),
            sender: self.required("EMAIL_SENDER")?,
            subject: self
                .optional("EMAIL_SUBJECT")
                .unwrap_or_else(|| defaults::EMAIL_SUBJECT.to_string()),
            template_dir: self
                .optional("EMAIL_TEMPLATE_DIR")
                .map_or_else(|| PathBuf::from(defaults::EMAIL_TEMPLATE_DIR), PathBuf::from),
            login_url: self.optional("FRONTEND_LOGIN_URL"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("CLERK_SECRET_KEY", "sk_test_123"),
        (
            "CLERK_JWT_KEY",
            "-----BEGIN PUBLIC KEY-----\\nMIIB\\n-----END PUBLIC KEY-----",
        ),
        ("API_URL", "http://localhost:3001"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() -> ConfigResult<()> {
        let config = AppConfig::from_lookup(lookup(REQUIRED))?;
        assert_eq!(config.app_name, "App Name");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0");
        assert_eq!(config.server.body_limit_bytes, 5 * 1024 * 1024);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(!config.security.enable_csp);
        assert!(!config.security.enable_hsts);
        assert!(config.mail.is_none());
        assert_eq!(config.assets.static_root, PathBuf::from("public"));
        assert_eq!(config.identity.secret_key.expose_secret(), "sk_test_123");
        assert!(config.identity.jwt_public_key.contains('\n'));
        assert_eq!(
            config.identity.api_base_url.as_str(),
            "https://api.clerk.com/v1"
        );
        assert!(config.openapi_path.is_none());
        Ok(())
    }

    #[test]
    fn missing_identity_variables_are_reported_by_name() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[..2])).err();
        assert!(matches!(
            err,
            Some(ConfigError::MissingVar { name: "API_URL" })
        ));

        let blank = AppConfig::from_lookup(lookup(&[
            ("CLERK_SECRET_KEY", "   "),
            ("CLERK_JWT_KEY", "-----BEGIN PUBLIC KEY-----"),
            ("API_URL", "http://localhost"),
        ]))
        .err();
        assert!(matches!(
            blank,
            Some(ConfigError::MissingVar {
                name: "CLERK_SECRET_KEY"
            })
        ));
    }

    #[test]
    fn jwt_key_must_be_pem() {
        let err = AppConfig::from_lookup(lookup(&[
            ("CLERK_SECRET_KEY", "sk"),
            ("CLERK_JWT_KEY", "not-a-key"),
            ("API_URL", "http://localhost"),
        ]))
        .err();
        assert!(matches!(
            err,
            Some(ConfigError::InvalidVar {
                name: "CLERK_JWT_KEY",
                value: None,
                ..
            })
        ));
    }

    #[test]
    fn production_environment_enables_hsts_and_overrides_apply() -> ConfigResult<()> {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(&[
            ("APP_ENV", "production"),
            ("APP_NAME", "Billing"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("BASE_URL", "https://a.example.com, https://b.example.com"),
            ("ENABLE_CSP", "true"),
            ("OPENAPI_PATH", "docs/api/openapi.json"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs))?;
        assert!(config.security.enable_hsts);
        assert!(config.security.enable_csp);
        assert_eq!(config.app_name, "Billing");
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(
            config.openapi_path,
            Some(PathBuf::from("docs/api/openapi.json"))
        );
        Ok(())
    }

    #[test]
    fn mail_section_requires_sender_once_host_is_set() -> ConfigResult<()> {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("EMAIL_HOST", "smtp.example.com"));
        let err = AppConfig::from_lookup(lookup(&pairs)).err();
        assert!(matches!(
            err,
            Some(ConfigError::MissingVar {
                name: "EMAIL_SENDER"
            })
        ));

        pairs.extend_from_slice(&[
            ("EMAIL_SENDER", "App <noreply@example.com>"),
            ("EMAIL_USER", "mailer"),
            ("EMAIL_PASSWORD", "hunter2"),
            ("FRONTEND_LOGIN_URL", "https://app.example.com/login"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs))?;
        let mail = config.mail.ok_or(ConfigError::MissingVar {
            name: "EMAIL_HOST",
        })?;
        assert_eq!(mail.port, 587);
        assert_eq!(mail.subject, "Your email subject");
        assert_eq!(mail.template_dir, PathBuf::from("email-templates"));
        assert_eq!(mail.username.as_deref(), Some("mailer"));
        assert_eq!(
            mail.password.as_ref().map(ExposeSecret::expose_secret),
            Some("hunter2")
        );
        assert_eq!(
            mail.login_url.as_deref(),
            Some("https://app.example.com/login")
        );
        Ok(())
    }

    #[test]
    fn upload_dir_must_live_under_static_root() -> ConfigResult<()> {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(&[("STATIC_ROOT", "/srv/www"), ("UPLOAD_DIR", "/srv/www/files")]);
        let config = AppConfig::from_lookup(lookup(&pairs))?;
        assert_eq!(config.assets.upload_dir, PathBuf::from("/srv/www/files"));

        pairs.push(("UPLOAD_DIR", "/tmp/uploads"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidVar {
                name: "UPLOAD_DIR",
                reason: "outside_static_root",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn wildcard_origins_are_rejected() {
        for origins in ["*", "https://a.example.com,*"] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("BASE_URL", origins));
            assert!(matches!(
                AppConfig::from_lookup(lookup(&pairs)),
                Err(ConfigError::InvalidVar {
                    name: "BASE_URL",
                    reason: "wildcard_with_credentials",
                    ..
                })
            ));
        }
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "0"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::InvalidVar { name: "PORT", .. })
        ));
    }
}
