//! Global tuning knobs whose value can be overridden from an environment variable.
//!
//! Some parameters of the solver are too specialized to deserve a command line option
//! but are still handy to tweak when investigating a run (for instance how often search
//! progress is reported). Such a parameter is declared as a `static` [`EnvParam`] that
//! records the name of an environment variable and a textual default.
//!
//! ```
//! use env_param::EnvParam;
//! static PROGRESS_PERIOD: EnvParam<u64> = EnvParam::new("DOC_PROGRESS_PERIOD", "1000");
//!
//! // the variable is not set in the environment: the default is parsed
//! assert_eq!(PROGRESS_PERIOD.get(), 1000);
//! ```
//!
//! The value is computed on first access and cached afterwards: changing the environment
//! once the parameter has been read has no effect.
//!
//! ```
//! use env_param::EnvParam;
//! static LOG_DECISIONS: EnvParam<bool> = EnvParam::new("DOC_LOG_DECISIONS", "false");
//!
//! std::env::set_var("DOC_LOG_DECISIONS", "true");
//! assert!(LOG_DECISIONS.get());
//! std::env::set_var("DOC_LOG_DECISIONS", "false"); // ignored, already initialized
//! assert!(LOG_DECISIONS.get());
//! ```
//!
//! [`EnvParam::set`] forces the value from code, which is mostly useful in tests.
//! It must happen before any read.

use once_cell::sync::OnceCell;
use std::str::FromStr;

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Declares a parameter read from the environment variable `env`, falling back to `default`.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn name(&self) -> &'static str {
        self.env
    }

    /// Returns true if the parameter has already been read or set.
    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        T::from_str(self.default).unwrap_or_else(|_| {
            eprintln!(
                "[env_param] ERROR {}: unparsable default value \"{}\"",
                self.env, self.default
            );
            panic!("[env_param] {}: invalid default value \"{}\"", self.env, self.default)
        })
    }

    fn read(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => match T::from_str(raw.trim()) {
                Ok(value) => value,
                Err(_) => {
                    eprintln!(
                        "[env_param] WARNING {}: cannot parse \"{}\", using default \"{}\"",
                        self.env, raw, self.default
                    );
                    self.parse_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                eprintln!("[env_param] {}: {}, using default \"{}\"", self.env, err, self.default);
                self.parse_default()
            }
        }
    }

    /// Returns a copy of the current value, initializing it on first access.
    ///
    /// # Panic
    /// Panics if the environment variable is absent or invalid and the default cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    /// Returns a reference to the current value, initializing it on first access.
    ///
    /// # Panic
    /// Panics if the environment variable is absent or invalid and the default cannot be parsed.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.read())
    }

    /// Forces the value of the parameter.
    ///
    /// # Panic
    /// Panics if the parameter was already initialized (read or set).
    pub fn set(&self, value: T) {
        if self.value.set(value).is_err() {
            panic!("Parameter {} is already initialized (i.e. was previously accessed).", self.env);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_used_when_unset() {
        static P: EnvParam<u32> = EnvParam::new("ENV_PARAM_TEST_UNSET_9f2c", "17");
        assert!(!P.is_initialized());
        assert_eq!(P.get(), 17);
        assert!(P.is_initialized());
    }

    #[test]
    fn invalid_environment_value_falls_back() {
        static P: EnvParam<u32> = EnvParam::new("ENV_PARAM_TEST_INVALID_41ad", "3");
        std::env::set_var(P.name(), "not-a-number");
        assert_eq!(P.get(), 3);
    }

    #[test]
    fn environment_value_is_trimmed() {
        static P: EnvParam<bool> = EnvParam::new("ENV_PARAM_TEST_TRIM_77e0", "false");
        std::env::set_var(P.name(), " true ");
        assert!(P.get());
    }

    #[test]
    fn set_before_read() {
        static P: EnvParam<u64> = EnvParam::new("ENV_PARAM_TEST_SET_0b1e", "1");
        P.set(42);
        assert_eq!(P.get(), 42);
    }

    #[test]
    #[should_panic]
    fn set_after_read_panics() {
        static P: EnvParam<u64> = EnvParam::new("ENV_PARAM_TEST_LATE_SET_c3d4", "1");
        let _ = P.get();
        P.set(2);
    }
}
