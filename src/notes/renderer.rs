use super::banner::Banner;
use crate::error::Result;
use crate::http::join_url;
use crate::jira::Issue;
use handlebars::Handlebars;
use serde::Serialize;

const NOTE_TEMPLATE: &str = "release_note";
const BANNER_TEMPLATE: &str = "banner";

#[derive(Debug, Serialize)]
struct NoteItem<'a> {
    key: &'a str,
    url: String,
    note: String,
}

#[derive(Debug, Serialize)]
struct NoteData<'a> {
    items: Vec<NoteItem<'a>>,
}

/// Turns fetched issues into the HTML fragment published to Confluence.
///
/// Field text is HTML-escaped so it cannot break the page's storage format.
pub struct NoteRenderer {
    template_engine: Handlebars<'static>,
    browse_base: String,
}

impl NoteRenderer {
    /// `browse_base` is the Jira base URL issue links are built from.
    pub fn new(browse_base: impl Into<String>) -> Result<Self> {
        let mut template_engine = Handlebars::new();
        template_engine.set_strict_mode(true);
        template_engine.register_template_string(
            NOTE_TEMPLATE,
            include_str!("../../templates/release_note.html.hbs"),
        )?;
        template_engine.register_template_string(
            BANNER_TEMPLATE,
            include_str!("../../templates/banner.html.hbs"),
        )?;

        Ok(Self {
            template_engine,
            browse_base: browse_base.into(),
        })
    }

    /// One list item per issue, in the order given.
    pub fn render_note(&self, issues: &[Issue], note_field: &str) -> Result<String> {
        let data = NoteData {
            items: issues
                .iter()
                .map(|issue| NoteItem {
                    key: &issue.key,
                    url: join_url(&self.browse_base, &format!("/browse/{}", issue.key)),
                    note: issue.field_text(note_field),
                })
                .collect(),
        };
        Ok(self.template_engine.render(NOTE_TEMPLATE, &data)?)
    }

    pub fn render_banner(&self, banner: &Banner) -> Result<String> {
        Ok(self.template_engine.render(BANNER_TEMPLATE, banner)?)
    }

    /// The note, optionally preceded by a banner.
    pub fn render(
        &self,
        issues: &[Issue],
        note_field: &str,
        banner: Option<&Banner>,
    ) -> Result<String> {
        let note = self.render_note(issues, note_field)?;
        match banner {
            Some(banner) => Ok(self.render_banner(banner)? + &note),
            None => Ok(note),
        }
    }
}
