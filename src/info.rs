use crate::refs::{ObjectReferences, RefType};
use chrono::{Datelike, NaiveDateTime, Timelike};
use pdf_writer::{Date as PDate, Pdf, TextStr};

/// General document metadata written into exported PDFs
#[derive(Default, Debug, Clone)]
pub struct Info {
    /// The title of the document, usually the product name
    pub title: Option<String>,
    /// The subject of the document.
    pub subject: Option<String>,
    /// Local time the document was created at. When unset no creation date is written.
    pub created: Option<NaiveDateTime>,
}

impl Info {
    /// Create a new info block, with all metadata set to [None]
    pub fn new() -> Info {
        Info::default()
    }

    /// Set the title of the info block, modifying `self`
    pub fn title<S: ToString>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the subject of the info block, modifying `self`
    pub fn subject<S: ToString>(&mut self, subject: S) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the creation time of the info block, modifying `self`
    pub fn created(&mut self, created: NaiveDateTime) -> &mut Self {
        self.created = Some(created);
        self
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let id = refs.gen(RefType::Info);
        let mut info = writer.document_info(id);

        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(subject) = &self.subject {
            info.subject(TextStr(subject.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));

        if let Some(created) = self.created {
            let date = PDate::new(created.year().clamp(0, 9999) as u16)
                .month(created.month() as u8)
                .day(created.day() as u8)
                .hour(created.hour() as u8)
                .minute(created.minute() as u8)
                .second(created.second() as u8);
            info.creation_date(date);
        }
    }
}
