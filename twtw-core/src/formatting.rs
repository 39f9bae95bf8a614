//! Topic and tab text, plus removal of mIRC-style formatting codes for hosts
//! that cannot hide them.

use twtw_common::models::ChannelStatus;

pub const BOLD: char = '\x02';
pub const COLOR: char = '\x03';
pub const HEX_COLOR: char = '\x04';
pub const RESET: char = '\x0f';
pub const MONOSPACE: char = '\x11';
pub const REVERSE: char = '\x16';
pub const ITALIC: char = '\x1d';
pub const STRIKETHROUGH: char = '\x1e';
pub const UNDERLINE: char = '\x1f';

/// `<glyph><name> | <game> | <title>`, with name and title in colour 18.
/// The offline placeholder title is set in italics.
pub fn topic_text(status: &ChannelStatus, glyph: &str) -> String {
    let title = if status.has_placeholder_title() {
        format!("{ITALIC}{}{RESET}", status.title)
    } else {
        status.title.clone()
    };
    format!(
        "{glyph}{COLOR}18{name}{COLOR}99 | {game} | {COLOR}18{title}{COLOR}99",
        name = status.display_name,
        game = status.game,
    )
}

pub fn tab_text(status: &ChannelStatus, glyph: &str) -> String {
    format!("{}{}", glyph, status.display_name)
}

/// Removes colour and attribute codes.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            COLOR => {
                // Up to two foreground digits, then optionally ",<bg>".
                if take_digits(&mut chars, 2) > 0 && chars.peek() == Some(&',') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                        chars.next();
                        take_digits(&mut chars, 2);
                    }
                }
            }
            HEX_COLOR => {
                take_hex(&mut chars, 6);
                if chars.peek() == Some(&',') {
                    chars.next();
                    take_hex(&mut chars, 6);
                }
            }
            BOLD | RESET | MONOSPACE | REVERSE | ITALIC | STRIKETHROUGH | UNDERLINE => {}
            other => out.push(other),
        }
    }
    out
}

fn take_digits<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>, max: usize) -> usize {
    let mut taken = 0;
    while taken < max && chars.peek().is_some_and(|d| d.is_ascii_digit()) {
        chars.next();
        taken += 1;
    }
    taken
}

fn take_hex<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>, max: usize) -> usize {
    let mut taken = 0;
    while taken < max && chars.peek().is_some_and(|d| d.is_ascii_hexdigit()) {
        chars.next();
        taken += 1;
    }
    taken
}
