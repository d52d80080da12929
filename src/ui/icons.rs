//! Shared UI icons.
//!
//! Emoji with plain-text fallbacks for terminals that cannot render them.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// File indicators
pub static FILE_NEW: Emoji<'_, '_> = Emoji("📄 ", "+");
pub static FILE_KEPT: Emoji<'_, '_> = Emoji("📌 ", "=");

// Environment indicators
pub static CONTAINER: Emoji<'_, '_> = Emoji("🐳 ", "");
