//! Builds small `.xlsx` packages on disk for the extraction tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

/// Style 0 is general, style 1 is the built-in short date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs></styleSheet>"#;

pub struct TestWorkbook {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    active_tab: Option<usize>,
}

impl TestWorkbook {
    pub fn new() -> TestWorkbook {
        TestWorkbook {
            sheets: Vec::new(),
            shared_strings: Vec::new(),
            active_tab: None,
        }
    }

    /// Adds a worksheet; `rows` is the inner XML of `<sheetData>`.
    pub fn sheet(mut self, name: &str, rows: &str) -> TestWorkbook {
        self.sheets.push((name.to_string(), rows.to_string()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> TestWorkbook {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn active_tab(mut self, tab: usize) -> TestWorkbook {
        self.active_tab = Some(tab);
        self
    }

    pub fn write(&self, path: &Path) -> ZipResult<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(self.relationships_xml().as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        if !self.shared_strings.is_empty() {
            zip.start_file("xl/sharedStrings.xml", options)?;
            zip.write_all(self.shared_strings_xml().as_bytes())?;
        }

        for (index, (_, rows)) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                rows
            );
            zip.write_all(xml.as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }

    fn workbook_xml(&self) -> String {
        let view = match self.active_tab {
            Some(tab) => format!(r#"<bookViews><workbookView activeTab="{}"/></bookViews>"#, tab),
            None => String::new(),
        };
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(index, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    name,
                    index + 1,
                    index + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}<sheets>{}</sheets></workbook>"#,
            view, sheets
        )
    }

    fn relationships_xml(&self) -> String {
        let relationships: String = (1..=self.sheets.len())
            .map(|index| {
                format!(
                    r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    index, index
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
            relationships
        )
    }

    fn shared_strings_xml(&self) -> String {
        let items: String = self
            .shared_strings
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
            self.shared_strings.len(),
            items
        )
    }
}
