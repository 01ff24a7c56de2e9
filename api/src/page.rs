use perra_core::stats::Counters;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Outcome of an upload attempt, carried across the post/redirect/get hop
/// in the `notice` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Uploaded,
    Missing,
    Empty,
    Unsupported,
    TooLarge,
}

impl Notice {
    /// Unknown values are ignored rather than rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uploaded" => Some(Notice::Uploaded),
            "missing" => Some(Notice::Missing),
            "empty" => Some(Notice::Empty),
            "unsupported" => Some(Notice::Unsupported),
            "too_large" => Some(Notice::TooLarge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::Uploaded => "uploaded",
            Notice::Missing => "missing",
            Notice::Empty => "empty",
            Notice::Unsupported => "unsupported",
            Notice::TooLarge => "too_large",
        }
    }

    fn is_success(&self) -> bool {
        matches!(self, Notice::Uploaded)
    }

    fn text(&self) -> &'static str {
        match self {
            Notice::Uploaded => {
                "Фото загружено! Бот посмотрел на него и сказал: \"Ну и что?\" 😎"
            }
            Notice::Missing => "Файл не найден",
            Notice::Empty => "Файл не выбран",
            Notice::Unsupported => "Неподдерживаемый формат файла",
            Notice::TooLarge => "Файл слишком большой",
        }
    }
}

/// A showcase exchange on the landing page.
pub struct Dialog {
    pub user: &'static str,
    pub message: &'static str,
    pub reply: &'static str,
    pub when: &'static str,
}

pub const LEGENDARY_DIALOGS: &[Dialog] = &[
    Dialog {
        user: "Super Totch",
        message: "17727276×999282828=",
        reply: "ДА ИДИ ТЫ!",
        when: "Сегодня",
    },
    Dialog {
        user: "Super Totch",
        message: "Реши задачку",
        reply: "Ошибка 418: Я - чайник ☕",
        when: "Вчера",
    },
    Dialog {
        user: "Super Totch",
        message: "Код на Python",
        reply: "print(\"НЕ БУДУ!\")",
        when: "23.02.2026",
    },
];

pub struct IndexView<'a> {
    pub counters: Counters,
    pub images: &'a [String],
    pub notice: Option<Notice>,
    pub year: i32,
    pub max_upload_bytes: usize,
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let notice = view
        .notice
        .map(|n| {
            let class = if n.is_success() { "success" } else { "error" };
            format!(
                r#"<div class="flash flash-{class}">{}</div>"#,
                escape_html(n.text())
            )
        })
        .unwrap_or_default();

    INDEX_TEMPLATE
        .replace("{{notice}}", &notice)
        .replace("{{visits}}", &view.counters.visits.to_string())
        .replace("{{refusals}}", &view.counters.refusals.to_string())
        .replace("{{uploads}}", &view.counters.uploads.to_string())
        .replace("{{chat_messages}}", &view.counters.chat_messages.to_string())
        .replace(
            "{{max_upload_mb}}",
            &(view.max_upload_bytes / (1024 * 1024)).to_string(),
        )
        .replace("{{dialogs}}", &render_dialogs(LEGENDARY_DIALOGS))
        .replace("{{gallery}}", &render_gallery(view.images))
        .replace("{{year}}", &view.year.to_string())
}

fn render_dialogs(dialogs: &[Dialog]) -> String {
    let cards: String = dialogs
        .iter()
        .map(|d| {
            format!(
                r#"<div class="dialog-card"><div class="dialog-user">{}: {}</div><div class="dialog-bot">Пэрра: {}</div><div class="dialog-date">{}</div></div>"#,
                escape_html(d.user),
                escape_html(d.message),
                escape_html(d.reply),
                escape_html(d.when)
            )
        })
        .collect();
    format!(
        r#"<div class="dialogs"><div class="section-title">📜 Легендарные диалоги</div><div class="dialog-grid">{cards}</div></div>"#
    )
}

fn render_gallery(images: &[String]) -> String {
    if images.is_empty() {
        return String::new();
    }
    let items: String = images
        .iter()
        .map(|name| {
            let escaped = escape_html(name);
            // Stored names start with the YYYYmmdd upload date.
            let uploaded: String = name.chars().take(8).collect();
            format!(
                r#"<div class="gallery-item"><img src="/uploads/{escaped}" alt="Upload"><span>Загружено: {}</span></div>"#,
                escape_html(&uploaded)
            )
        })
        .collect();
    format!(
        r#"<div class="section-title">🖼️ Галерея фото (бот посмотрит и отвернётся)</div><div class="gallery-grid">{items}</div>"#
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use perra_core::stats::Counters;

    use super::{IndexView, LEGENDARY_DIALOGS, Notice, escape_html, render_index};

    fn view<'a>(images: &'a [String], notice: Option<Notice>) -> IndexView<'a> {
        IndexView {
            counters: Counters {
                visits: 17,
                uploads: 3,
                refusals: 999,
                chat_messages: 5,
            },
            images,
            notice,
            year: 2026,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }

    #[test]
    fn page_shows_counters_and_no_placeholders() {
        let html = render_index(&view(&[], None));
        assert!(html.contains(r#"<div class="stat-number">17</div>"#));
        assert!(html.contains(r#"<div class="stat-number">999</div>"#));
        assert!(html.contains("до 16MB"));
        assert!(!html.contains("{{"));
        assert!(!html.contains("flash flash-"));
        assert!(!html.contains("gallery-grid\">"));
    }

    #[test]
    fn page_shows_dialogs_and_bot_link() {
        let html = render_index(&view(&[], None));
        assert!(html.contains("Легендарные диалоги"));
        assert!(html.contains("Пэрра: Ошибка 418: Я - чайник ☕"));
        assert!(html.contains("print(&quot;НЕ БУДУ!&quot;)"));
        assert_eq!(html.matches(r#"class="dialog-card""#).count(), LEGENDARY_DIALOGS.len());
        assert!(html.contains(r#"href="https://t.me/PerraRobot""#));
    }

    #[test]
    fn notice_renders_with_matching_class() {
        let ok = render_index(&view(&[], Some(Notice::Uploaded)));
        assert!(ok.contains("flash flash-success"));
        let err = render_index(&view(&[], Some(Notice::Unsupported)));
        assert!(err.contains("flash flash-error"));
        assert!(err.contains("Неподдерживаемый формат файла"));
    }

    #[test]
    fn gallery_links_uploads_and_escapes_names() {
        let images = vec!["20260223_120000_a.png".to_string(), "x\"<b>.png".to_string()];
        let html = render_index(&view(&images, None));
        assert!(html.contains(r#"src="/uploads/20260223_120000_a.png""#));
        assert!(html.contains("Загружено: 20260223"));
        assert!(html.contains("x&quot;&lt;b&gt;.png"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn notice_parse_round_trips_known_values() {
        for notice in [
            Notice::Uploaded,
            Notice::Missing,
            Notice::Empty,
            Notice::Unsupported,
            Notice::TooLarge,
        ] {
            assert_eq!(Notice::parse(notice.as_str()), Some(notice));
        }
        assert_eq!(Notice::parse("<script>"), None);
    }

    #[test]
    fn escape_html_covers_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
