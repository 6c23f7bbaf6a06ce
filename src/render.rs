//! HTML rendering for the playtime page.
//!
//! The template is embedded at build time from `templates/index.html`; its
//! `{{ name }}` placeholders are filled in a single pass so substituted values
//! are never re-scanned.

use crate::steam::GameEntry;

include!(concat!(env!("OUT_DIR"), "/index_html.rs"));

pub const PROMPT_USER_NAME: &str = "Enter a Steam ID";
pub const UNKNOWN_USER: &str = "Unknown User";
pub const BASE_HEADER: &str = "Steam Game Playtime";

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPage {
    pub header_message: String,
    pub user_name: String,
    pub steamid: String,
    pub games: Vec<GameEntry>,
}

impl IndexPage {
    /// The blank form shown before anything was submitted.
    pub fn empty() -> Self {
        Self {
            header_message: BASE_HEADER.to_string(),
            user_name: PROMPT_USER_NAME.to_string(),
            steamid: String::new(),
            games: Vec::new(),
        }
    }

    pub fn populated(steamid: &str, user_name: &str, games: Vec<GameEntry>) -> Self {
        let user_name = if user_name.is_empty() {
            UNKNOWN_USER
        } else {
            user_name
        };

        Self {
            header_message: format!("{} For {}", BASE_HEADER, user_name),
            user_name: user_name.to_string(),
            steamid: steamid.to_string(),
            games,
        }
    }

    pub fn render(&self) -> String {
        let rows = self
            .games
            .iter()
            .map(|game| {
                format!(
                    "            <tr><td>{}</td><td class=\"hours\">{:.2}</td></tr>",
                    escape_html(&game.title),
                    game.hours
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        fill_template(INDEX_HTML, |name| match name {
            "header_message" => Some(escape_html(&self.header_message)),
            "user_name" => Some(escape_html(&self.user_name)),
            "steamid" => Some(escape_html(&self.steamid)),
            "games" => Some(rows.clone()),
            _ => None,
        })
    }
}

/// Replaces every `{{ name }}` in `template` with `lookup(name)`.
/// Unknown placeholders are left untouched.
fn fill_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_fill_template_single_pass() {
        let out = fill_template("<h1>{{ a }}</h1>{{b}}{{ missing }}{{ tail", |name| match name {
            "a" => Some("{{ b }}".to_string()),
            "b" => Some("B".to_string()),
            _ => None,
        });
        assert_eq!(out, "<h1>{{ b }}</h1>B{{ missing }}{{ tail");
    }

    #[test]
    fn test_empty_page() {
        let html = IndexPage::empty().render();
        assert!(html.contains("<h1>Steam Game Playtime</h1>"));
        assert!(html.contains("Enter a Steam ID"));
        assert!(html.contains(r#"value="""#));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_populated_page() {
        let games = vec![
            GameEntry {
                appid: 10,
                title: "A".to_string(),
                hours: 2.0,
            },
            GameEntry {
                appid: 20,
                title: "<B>".to_string(),
                hours: 1.5,
            },
        ];
        let page = IndexPage::populated("r0mb0", "Robin", games);
        assert_eq!(page.header_message, "Steam Game Playtime For Robin");

        let html = page.render();
        assert!(html.contains("<h1>Steam Game Playtime For Robin</h1>"));
        assert!(html.contains(r#"value="r0mb0""#));

        let a = html.find("<td>A</td><td class=\"hours\">2.00</td>").unwrap();
        let b = html.find("<td>&lt;B&gt;</td><td class=\"hours\">1.50</td>").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_blank_display_name() {
        let page = IndexPage::populated("123", "", Vec::new());
        assert_eq!(page.user_name, UNKNOWN_USER);
        assert_eq!(page.header_message, "Steam Game Playtime For Unknown User");
    }
}
