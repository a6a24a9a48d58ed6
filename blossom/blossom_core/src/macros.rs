//! Convenience macros for the Blossom policy engine.

/// Log an event with the given level and module.
///
/// The message is prefixed with the calling module path, and any
/// `key => value` pairs are rendered after it as `key=value` metadata.
///
/// # Examples
///
/// ```
/// use blossom_core::log_event;
/// use blossom_core::utils::LogLevel;
///
/// log_event!(LogLevel::Info, "Asset onboarded");
///
/// log_event!(LogLevel::Debug, "Decision",
///     identity => "super:BlossomMSP",
///     target => "RBAC.assets",
///     allowed => true,
/// );
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:expr, $message:expr) => {
        {
            use $crate::utils::LogLevel;
            match $level {
                LogLevel::Error => $crate::log::error!("[{}] {}", module_path!(), $message),
                LogLevel::Warning => $crate::log::warn!("[{}] {}", module_path!(), $message),
                LogLevel::Info => $crate::log::info!("[{}] {}", module_path!(), $message),
                LogLevel::Debug => $crate::log::debug!("[{}] {}", module_path!(), $message),
                LogLevel::Trace => $crate::log::trace!("[{}] {}", module_path!(), $message),
            }
        }
    };

    ($level:expr, $message:expr, $($key:ident => $value:expr),+ $(,)?) => {
        {
            use $crate::utils::LogLevel;
            let metadata = vec![$(format!("{}={}", stringify!($key), $value)),+].join(" ");
            match $level {
                LogLevel::Error => $crate::log::error!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Warning => $crate::log::warn!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Info => $crate::log::info!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Debug => $crate::log::debug!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Trace => $crate::log::trace!("[{}] {}: {}", module_path!(), $message, metadata),
            }
        }
    };
}

/// Return early with a domain error unless the condition holds.
///
/// # Examples
///
/// ```
/// use blossom_core::{ensure_domain, error::DomainError, Result};
///
/// fn checkout(requested: usize, available: usize) -> Result<()> {
///     ensure_domain!(
///         requested <= available,
///         DomainError::InsufficientAvailability {
///             asset: "asset-1".to_string(),
///             requested,
///             available,
///         }
///     );
///     Ok(())
/// }
///
/// assert!(checkout(1, 2).is_ok());
/// assert!(checkout(3, 2).is_err());
/// ```
#[macro_export]
macro_rules! ensure_domain {
    ($cond:expr, $err:expr) => {
        if !$cond {
            let err: $crate::error::DomainError = $err;
            $crate::log::info!("[{}] Domain check failed: {}", module_path!(), err);
            return Err(err.into());
        }
    };
}
