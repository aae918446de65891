use crate::error::AuditError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::package::ZipHelper;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xml::match_xml_events;
use crate::spreadsheet::xml::XmlNodeHelper;
use crate::spreadsheet::xml::XmlReader;
use crate::spreadsheet::xml::XmlTextContextHelper;
use crate::spreadsheet::SheetError;
use log::debug;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

// Element local names; prefixes such as `x:` are ignored
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_SHEET: &[u8] = b"sheet";
const TAG_WORKBOOK_PROPERTIES: &[u8] = b"workbookPr";
const TAG_WORKBOOK_VIEW: &[u8] = b"workbookView";
const TAG_CUSTOM_FORMATS: &[u8] = b"numFmts";
const TAG_CUSTOM_FORMAT: &[u8] = b"numFmt";
const TAG_FORMAT_INDEXES: &[u8] = b"cellXfs";
const TAG_FORMAT_INDEX: &[u8] = b"xf";
const TAG_SHARED_STRING_ITEM: &[u8] = b"si";
const TAG_PHONETIC_TEXT: &[u8] = b"rPh";
const TAG_TEXT: &[u8] = b"t";
const TAG_ROW: &[u8] = b"row";
const TAG_CELL: &[u8] = b"c";
const TAG_INLINE_STRING: &[u8] = b"is";
const TAG_VALUE: &[u8] = b"v";

/// Signature of an OLE compound file: encrypted OOXML packages and legacy `.xls`.
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// An opened `.xlsx` workbook.
pub struct Workbook {
    /// Path the workbook was opened from
    pub path: String,
    zip: ZipArchive<BufReader<File>>,
    /// (sheet name, zip path) in workbook order
    sheets: Vec<(String, String)>,
    active_tab: usize,
    /// Cell type per style index, used to spot date-formatted numbers
    number_formats: Vec<CellType>,
    shared_strings: Vec<String>,
}

impl Workbook {
    /// Opens a workbook and loads its sheet list, styles and shared strings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Workbook, AuditError> {
        let path = path.as_ref().display().to_string();
        let mut reader = BufReader::new(File::open(&path)?);
        if reader.fill_buf()?.starts_with(&CFB_SIGNATURE) {
            return Err(SheetError::UnsupportedFormat(path).into());
        }

        let mut zip = ZipArchive::new(reader)?;
        let (sheets, is_1904, active_tab) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            return Err(SheetError::NoWorksheets(path).into());
        }
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        let shared_strings = load_shared_strings(&mut zip)?;
        debug!(
            "Opened {}: {} sheet(s), {} shared string(s), 1904 dates: {}",
            path,
            sheets.len(),
            shared_strings.len(),
            is_1904
        );

        Ok(Workbook {
            path,
            zip,
            sheets,
            active_tab,
            number_formats,
            shared_strings,
        })
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The sheet the workbook was saved with selected; the first sheet when
    /// the workbook does not say.
    pub fn active_sheet_name(&self) -> &str {
        let index = if self.active_tab < self.sheets.len() {
            self.active_tab
        } else {
            0
        };
        &self.sheets[index].0
    }

    pub fn read_active_sheet(&mut self) -> Result<Sheet, AuditError> {
        let name = self.active_sheet_name().to_owned();
        self.read_sheet(&name)
    }

    /// Reads every non-empty cell of the named worksheet.
    pub fn read_sheet(&mut self, name: &str) -> Result<Sheet, AuditError> {
        let zip_path = self
            .sheets
            .iter()
            .find(|(sheet_name, _)| sheet_name == name)
            .map(|(_, zip_path)| zip_path.to_owned())
            .ok_or_else(|| SheetError::WorksheetNotFound(self.path.to_owned(), name.to_owned()))?;

        let mut sheet = Sheet::new(name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut is_shared = false;
        let mut value = String::new();
        let mut reader = self
            .zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| SheetError::MissingPart(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_ROW => {
                if let Some(number) = event.get_attribute_value("r")? {
                    row_count = number.parse::<usize>()?.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_CELL => {
                (row, col) = event
                    .get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                is_shared = false;
                value.clear();
                kind = match event.get_attribute_value("t")?.as_deref() {
                    Some("s") => {
                        is_shared = true;
                        CellType::String
                    }
                    Some("inlineStr") | Some("str") => CellType::String,
                    Some("d") => CellType::IsoDateTime,
                    Some("b") => CellType::Boolean,
                    Some("e") => CellType::Error,
                    _ => CellType::Number,
                };
                if kind == CellType::Number {
                    if let Some(style) = event.get_attribute_value("s")? {
                        if !style.is_empty() {
                            let index = style.parse::<usize>()?;
                            kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                        }
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.local_name().as_ref() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.local_name().as_ref() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    let text = if is_shared {
                        let index = value.trim().parse::<usize>()?;
                        self.shared_strings
                            .get(index)
                            .cloned()
                            .ok_or(SheetError::SharedStringOutOfRange(index))?
                    } else {
                        std::mem::take(&mut value)
                    };
                    if !text.is_empty() {
                        sheet.push(Cell { row, col, kind, value: text });
                    }
                }
                kind = CellType::Empty;
                is_shared = false;
                value.clear();
            }
        });

        debug!("Read sheet '{}' with {} row(s)", name, sheet.row_count());
        Ok(sheet)
    }
}

/// Loads the sheet list, the date system and the active tab from `xl/workbook.xml`.
fn load_workbook(zip: &mut ZipArchive<BufReader<File>>) -> Result<(Vec<(String, String)>, bool, usize), AuditError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SheetError::MissingPart("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    let mut active_tab = 0usize;
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
            let mut name = None::<String>;
            let mut id = None::<String>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?.to_string());
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?.to_string());
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id) {
                    sheets.push((name, path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event
                .get_attribute_value("date1904")?
                .map(|value| value == "1" || value == "true")
                .unwrap_or(false);
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_WORKBOOK_VIEW => {
            if let Some(tab) = event.get_attribute_value("activeTab")? {
                active_tab = tab.parse::<usize>()?;
            }
        }
    });
    Ok((sheets, is_1904, active_tab))
}

/// Maps relationship ids to worksheet part paths.
fn load_relationships(zip: &mut ZipArchive<BufReader<File>>, path: &str) -> Result<HashMap<String, String>, AuditError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| SheetError::MissingPart(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(&target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Resolves the cell type of every style index in `xl/styles.xml`.
fn load_number_formats(zip: &mut ZipArchive<BufReader<File>>, is_1904: bool) -> Result<Vec<CellType>, AuditError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.local_name().as_ref() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.local_name().as_ref() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.local_name().as_ref() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.local_name().as_ref() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?;
            format_indexes.push(id.map(|id| id.to_string()).unwrap_or_default());
        }
    });

    let number_formats = format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect();
    Ok(number_formats)
}

fn load_shared_strings(zip: &mut ZipArchive<BufReader<File>>) -> Result<Vec<String>, AuditError> {
    let mut shared_strings = Vec::<String>::new();
    let mut reader = match zip.xml_reader("xl/sharedStrings.xml")? {
        Some(reader) => reader,
        None => return Ok(shared_strings),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
            shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
        }
    });
    Ok(shared_strings)
}

/// Collects the text up to `end_tag`, skipping phonetic runs.
///
/// `is_text_content` marks elements whose text is the value itself (`<v>`);
/// otherwise only text inside `<t>` runs counts.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, AuditError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

/// Normalizes a relationship target to a path inside the package.
fn to_zip_path(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
