//! Reply rendering.
//!
//! Every reply is an [`OutgoingMessage`], independent of the transport that
//! delivers it. Texts use Telegram's legacy Markdown unless marked plain.

use std::collections::BTreeMap;

use crate::models::{BotConfig, Document};
use crate::services::{SearchResults, split_text};

pub const MSG_EMPTY_QUERY: &str = "❌ Sila masukkan kata kunci untuk carian";
pub const MSG_SEARCHING: &str = "🔍 Mencari fatwa...";
pub const MSG_BAD_ID: &str = "❌ Ralat membaca ID fatwa";
pub const MSG_SEARCH_FAILED: &str = "❌ Carian gagal, sila cuba lagi";

const WELCOME: &str = "🕌 *Selamat Datang ke ApaHukumBot*

Bot ini membantu anda mencari fatwa daripada Jabatan Mufti Wilayah Persekutuan.

*Cara menggunakan:*
• Taip sebarang kata kunci untuk carian umum
• /search [kata kunci] - Cari dalam tajuk dan kandungan
• /title [kata kunci] - Cari berdasarkan tajuk sahaja
• /category [kategori] - Cari berdasarkan kategori
• /categories - Lihat senarai kategori
• /help - Panduan lengkap

*Contoh:*
• \"haiwan peliharaan\"
• /title solat
• /category irsyad

Mulakan pencarian anda sekarang! 🔍";

const HELP: &str = "📚 *Panduan Penggunaan Bot Fatwa*

*Perintah Yang Tersedia:*

🔍 *Pencarian Umum*
• Taip sahaja kata kunci anda
• Contoh: \"zakat fitrah\"

🔍 *Pencarian Khusus*
• `/search [kata kunci]` - Cari dalam tajuk dan kandungan
• `/title [kata kunci]` - Cari berdasarkan tajuk sahaja
• `/category [kategori]` - Cari berdasarkan kategori

📂 *Kategori*
• `/categories` - Lihat semua kategori yang ada

ℹ️ *Maklumat Lain*
• `/help` - Papar panduan ini
• `/start` - Mula semula

*Tips Pencarian:*
• Gunakan kata kunci yang ringkas dan tepat
• Boleh guna Bahasa Malaysia atau Arab
• Cari menggunakan sebahagian tajuk untuk hasil yang lebih baik

Selamat mencari fatwa! 🤲";

/// How the transport should interpret the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    Plain,
}

/// Inline button carrying a callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub data: String,
}

/// One message to deliver to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub parse_mode: ParseMode,
    pub disable_preview: bool,
    /// One button per keyboard row
    pub buttons: Vec<InlineButton>,
}

impl OutgoingMessage {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Markdown,
            disable_preview: false,
            buttons: Vec::new(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            parse_mode: ParseMode::Plain,
            ..Self::markdown(text)
        }
    }

    pub fn without_preview(mut self) -> Self {
        self.disable_preview = true;
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<InlineButton>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Escape legacy Markdown control characters in scraped text.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Bold span over scraped or user text.
///
/// Backslash escapes do not apply inside an entity, so each literal `*`
/// closes the span and is escaped between two bold runs.
pub fn bold(text: &str) -> String {
    text.split('*')
        .map(|part| {
            if part.is_empty() {
                String::new()
            } else {
                format!("*{part}*")
            }
        })
        .collect::<Vec<_>>()
        .join("\\*")
}

pub fn render_welcome() -> OutgoingMessage {
    OutgoingMessage::markdown(WELCOME)
}

pub fn render_help() -> OutgoingMessage {
    OutgoingMessage::markdown(HELP)
}

pub fn render_categories(summary: &BTreeMap<&str, usize>) -> OutgoingMessage {
    let mut text = String::from("📂 *Kategori Fatwa Yang Tersedia:*\n\n");
    for (category, count) in summary {
        text.push_str(&format!("• {} ({})\n", escape_markdown(category), count));
    }
    text.push_str("\n💡 *Cara mencari berdasarkan kategori:*\n");
    text.push_str("`/category [nama kategori]`\n\n");
    text.push_str("*Contoh:* `/category irsyad`");
    OutgoingMessage::markdown(text)
}

pub fn render_no_results(query: &str) -> OutgoingMessage {
    OutgoingMessage::markdown(format!(
        "❌ Tiada fatwa dijumpai untuk: {}",
        bold(query)
    ))
}

/// Result list with one "read" button per item.
///
/// Content previews are dropped when the full list would exceed the
/// message limit.
pub fn render_results(results: &SearchResults<'_>, config: &BotConfig) -> OutgoingMessage {
    let with_previews = results_message(results, Some(config.result_preview_chars));
    if with_previews.char_len() <= config.max_message_len {
        return with_previews;
    }
    results_message(results, None)
}

fn results_message(results: &SearchResults<'_>, preview_chars: Option<usize>) -> OutgoingMessage {
    let mut text = format!(
        "🔍 {}\n\n",
        bold(&format!("Hasil carian untuk: {}", results.query))
    );
    if results.truncated {
        text.push_str(&format!(
            "📝 *Paparan {} hasil pertama daripada {}*\n\n",
            results.items.len(),
            results.total_matches
        ));
    }

    let mut buttons = Vec::with_capacity(results.items.len());
    for (index, document) in results.items.iter().enumerate() {
        let number = index + 1;
        text.push_str(&bold(&format!("{}. {}", number, document.title)));
        text.push('\n');
        text.push_str(&format!(
            "📅 {} | 👁 {} views\n",
            escape_markdown(&document.date),
            document.hits
        ));
        if let Some(chars) = preview_chars {
            text.push_str(&format!("📄 {}\n", escape_markdown(&document.preview(chars))));
        }
        text.push('\n');

        buttons.push(InlineButton {
            text: format!("📖 Baca Fatwa {number}"),
            data: document.view_payload(),
        });
    }

    OutgoingMessage::markdown(text).with_buttons(buttons)
}

/// Full view of one document.
///
/// A view that fits the message limit is sent whole. Otherwise the header
/// goes first, then the content in numbered plain-text parts, then the link.
pub fn render_detail(document: &Document, config: &BotConfig) -> Vec<OutgoingMessage> {
    let header = format!(
        "📖 {}\n\n🆔 ID: {}\n📅 Tarikh: {}\n👁 Paparan: {}\n📂 Kategori: {}\n\n",
        bold(&document.title),
        document.id,
        escape_markdown(&document.date),
        document.hits,
        escape_markdown(&document.category),
    );
    let footer = format!("\n\n🔗 [Baca penuh di laman web]({})", document.url);

    let full = format!("{}{}{}", header, escape_markdown(&document.content), footer);
    if full.chars().count() <= config.max_message_len {
        return vec![OutgoingMessage::markdown(full).without_preview()];
    }

    let chunks: Vec<String> = split_text(&document.content, config.chunk_limit())
        .into_iter()
        .map(|chunk| chunk.trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect();
    let total = chunks.len();

    let mut messages = Vec::with_capacity(total + 2);
    messages.push(OutgoingMessage::markdown(header));
    for (index, chunk) in chunks.into_iter().enumerate() {
        messages.push(OutgoingMessage::plain(format!(
            "📄 Bahagian {}/{}\n\n{}",
            index + 1,
            total,
            chunk
        )));
    }
    messages.push(OutgoingMessage::markdown(footer).without_preview());
    messages
}
