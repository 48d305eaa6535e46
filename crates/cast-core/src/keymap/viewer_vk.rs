//! Viewer key code to host-native virtual key code translation table.
//!
//! The viewer side reports Windows/DOM `KeyboardEvent.keyCode` values
//! (0x00–0xFF); the host expects macOS `CGKeyCode` values.  Symbol mappings
//! assume a U.S. layout on both ends.
//!
//! `VIEWER_TO_NATIVE_TABLE` is a compile-time constant array of 256 entries
//! indexed by viewer key code, so every captured key event translates with a
//! single O(1) array read.  Codes without a native equivalent store `None`.

/// Translates a viewer key code to the host's native virtual key code.
///
/// Returns `None` for codes that have no native equivalent; callers drop
/// such keys rather than forwarding a guess.
///
/// # Examples
///
/// ```rust
/// use cast_core::keymap::viewer_to_native;
///
/// assert_eq!(viewer_to_native(65), Some(0));    // A
/// assert_eq!(viewer_to_native(13), Some(36));   // Enter
/// assert_eq!(viewer_to_native(255), None);
/// ```
pub fn viewer_to_native(code: u16) -> Option<u16> {
    if code < 256 {
        VIEWER_TO_NATIVE_TABLE[code as usize]
    } else {
        None
    }
}

/// Complete viewer → native mapping table indexed by viewer key code.
///
/// Entries are `None` when no native equivalent exists.
const VIEWER_TO_NATIVE_TABLE: [Option<u16>; 256] = {
    let mut t: [Option<u16>; 256] = [None; 256];

    // ── Letters A–Z ───────────────────────────────────────────────────────────
    t[65] = Some(0); // A
    t[66] = Some(11); // B
    t[67] = Some(8); // C
    t[68] = Some(2); // D
    t[69] = Some(14); // E
    t[70] = Some(3); // F
    t[71] = Some(5); // G
    t[72] = Some(4); // H
    t[73] = Some(34); // I
    t[74] = Some(38); // J
    t[75] = Some(40); // K
    t[76] = Some(37); // L
    t[77] = Some(46); // M
    t[78] = Some(45); // N
    t[79] = Some(31); // O
    t[80] = Some(35); // P
    t[81] = Some(12); // Q
    t[82] = Some(15); // R
    t[83] = Some(1); // S
    t[84] = Some(17); // T
    t[85] = Some(32); // U
    t[86] = Some(9); // V
    t[87] = Some(13); // W
    t[88] = Some(7); // X
    t[89] = Some(16); // Y
    t[90] = Some(6); // Z

    // ── Digit row 0–9 ─────────────────────────────────────────────────────────
    t[48] = Some(29); // 0
    t[49] = Some(18); // 1
    t[50] = Some(19); // 2
    t[51] = Some(20); // 3
    t[52] = Some(21); // 4
    t[53] = Some(23); // 5
    t[54] = Some(22); // 6
    t[55] = Some(26); // 7
    t[56] = Some(28); // 8
    t[57] = Some(25); // 9

    // ── Symbols (U.S. layout) ─────────────────────────────────────────────────
    t[186] = Some(41); // ;
    t[187] = Some(24); // =
    t[188] = Some(43); // ,
    t[189] = Some(27); // -
    t[190] = Some(47); // .
    t[191] = Some(44); // /
    t[192] = Some(50); // `
    t[219] = Some(33); // [
    t[220] = Some(42); // \
    t[221] = Some(30); // ]
    t[222] = Some(39); // '

    // ── Modifiers ─────────────────────────────────────────────────────────────
    t[16] = Some(56); // Shift
    t[17] = Some(59); // Control
    t[18] = Some(58); // Option (Alt)
    t[91] = Some(55); // Command (left)
    t[93] = Some(55); // Command (right, folded onto left)

    // ── Navigation and editing ────────────────────────────────────────────────
    t[8] = Some(51); // Backspace
    t[9] = Some(48); // Tab
    t[13] = Some(36); // Enter
    t[27] = Some(53); // Escape
    t[32] = Some(49); // Space
    t[33] = Some(116); // Page Up
    t[34] = Some(121); // Page Down
    t[35] = Some(119); // End
    t[36] = Some(115); // Home
    t[37] = Some(123); // Left Arrow
    t[38] = Some(126); // Up Arrow
    t[39] = Some(124); // Right Arrow
    t[40] = Some(125); // Down Arrow
    t[46] = Some(117); // Delete

    // ── Function keys F1–F12 ──────────────────────────────────────────────────
    t[112] = Some(122); // F1
    t[113] = Some(120); // F2
    t[114] = Some(99); // F3
    t[115] = Some(118); // F4
    t[116] = Some(96); // F5
    t[117] = Some(97); // F6
    t[118] = Some(98); // F7
    t[119] = Some(100); // F8
    t[120] = Some(101); // F9
    t[121] = Some(109); // F10
    t[122] = Some(103); // F11
    t[123] = Some(111); // F12

    t
};

// ── Tests ─────────────────────────────────────────────────────────────────────
