use crate::config::{CapabilityTier, SafetyConfig};
use std::fmt;
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, Clone)]
pub struct SafetyDenied {
    pub reason: String,
    pub tier: CapabilityTier,
}

impl fmt::Display for SafetyDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Safety denied ({:?}): {}", self.tier, self.reason)
    }
}

impl std::error::Error for SafetyDenied {}

// ============================================================================
// CapabilityGuard
// ============================================================================

/// Gatekeeper for the file tools. Every path a tool touches goes through
/// `check_read` or `check_write` first.
#[derive(Debug, Clone)]
pub struct CapabilityGuard {
    config: SafetyConfig,
}

impl CapabilityGuard {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    pub fn max_read_bytes(&self) -> usize {
        self.config.max_read_bytes
    }

    /// Check if a file path may be read under the current tier.
    pub fn check_read(&self, path: &Path) -> Result<(), SafetyDenied> {
        match self.config.tier {
            CapabilityTier::Full => Ok(()),
            CapabilityTier::ReadOnly | CapabilityTier::Restricted => self.check_contained(path),
        }
    }

    /// Check if a file path may be written under the current tier.
    pub fn check_write(&self, path: &Path) -> Result<(), SafetyDenied> {
        match self.config.tier {
            CapabilityTier::Full => Ok(()),
            CapabilityTier::ReadOnly => Err(self.deny("Write access denied in ReadOnly tier")),
            CapabilityTier::Restricted => self.check_contained(path),
        }
    }

    fn check_contained(&self, path: &Path) -> Result<(), SafetyDenied> {
        if path.as_os_str().is_empty() {
            return Err(self.deny("Empty path"));
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(self.deny(format!(
                "Parent-directory traversal not allowed: '{}'",
                path.display()
            )));
        }

        if self.config.allowed_paths.is_empty() {
            // No whitelist configured: workspace-relative paths only
            return if path.is_absolute() {
                Err(self.deny(format!(
                    "Absolute path '{}' not allowed without an allowed_paths whitelist",
                    path.display()
                )))
            } else {
                Ok(())
            };
        }

        for allowed in &self.config.allowed_paths {
            // Try both raw and canonical comparisons to handle symlinks (e.g. /tmp → /private/tmp on macOS)
            if path.starts_with(allowed) {
                return Ok(());
            }
            let canonical_path = canonicalize_best_effort(path);
            let canonical_allowed = canonicalize_best_effort(allowed);
            if canonical_path.starts_with(&canonical_allowed) {
                return Ok(());
            }
        }
        Err(self.deny(format!(
            "Path '{}' is outside allowed paths",
            path.display()
        )))
    }

    fn deny(&self, reason: impl Into<String>) -> SafetyDenied {
        SafetyDenied {
            reason: reason.into(),
            tier: self.config.tier,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Best-effort path canonicalization. A file that does not exist yet is
/// resolved through its parent directory.
fn canonicalize_best_effort(path: &Path) -> PathBuf {
    if let Ok(p) = std::fs::canonicalize(path) {
        return p;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

// ============================================================================
// Tests
// ============================================================================
