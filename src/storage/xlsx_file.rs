//! Excel workbook store.
//!
//! Written with `rust_xlsxwriter`, read back with `calamine`. Salaries are
//! numeric cells except values an `f64` cannot hold exactly (the unbounded
//! sentinel among them), which are stored as digit strings.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{AppError, Result};
use crate::models::{RECORD_COLUMNS, RawSalary, VacancyRecord};
use crate::storage::{VacancyStore, local};

pub const SHEET_NAME: &str = "Vacancies";

/// Largest integer an `f64` cell represents exactly.
const MAX_EXACT_NUMBER: u64 = 1 << 53;

#[derive(Debug, Clone)]
pub struct XlsxFileStore {
    path: PathBuf,
}

impl XlsxFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn render(records: &[VacancyRecord]) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, title) in RECORD_COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, &record.id)?;
            worksheet.write_string(row, 1, &record.name)?;
            worksheet.write_string(row, 2, &record.url)?;
            write_salary(worksheet, row, 3, &record.min_salary)?;
            write_salary(worksheet, row, 4, &record.max_salary)?;
            worksheet.write_string(row, 5, &record.employer_name)?;
            worksheet.write_string(row, 6, &record.employer_url)?;
            worksheet.write_string(row, 7, &record.requirements)?;
            worksheet.write_string(row, 8, &record.area)?;
        }

        workbook.save_to_buffer()
    }
}

fn write_salary(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    salary: &RawSalary,
) -> std::result::Result<(), XlsxError> {
    match salary {
        RawSalary::Unsigned(value) if *value <= MAX_EXACT_NUMBER => {
            worksheet.write_number(row, col, *value as f64)?;
        }
        RawSalary::Unsigned(value) => {
            worksheet.write_string(row, col, value.to_string())?;
        }
        RawSalary::Signed(value) => {
            worksheet.write_number(row, col, *value as f64)?;
        }
        RawSalary::Float(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        RawSalary::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
        RawSalary::Absent | RawSalary::Invalid => {}
    }
    Ok(())
}

fn salary_cell(cell: Option<&Data>) -> RawSalary {
    match cell {
        None | Some(Data::Empty) => RawSalary::Absent,
        Some(Data::Int(value)) => match u64::try_from(*value) {
            Ok(value) => RawSalary::Unsigned(value),
            Err(_) => RawSalary::Signed(*value),
        },
        Some(Data::Float(value)) => RawSalary::Float(*value),
        Some(Data::String(text)) => RawSalary::Text(text.clone()),
        Some(_) => RawSalary::Invalid,
    }
}

fn text_cell(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(text)) => text.clone(),
        Some(Data::Int(value)) => value.to_string(),
        Some(Data::Float(value)) => value.to_string(),
        Some(Data::Bool(flag)) => flag.to_string(),
        Some(_) => String::new(),
    }
}

impl VacancyStore for XlsxFileStore {
    fn read_all(&self) -> Result<Vec<VacancyRecord>> {
        let Some(bytes) = local::read_optional(&self.path)? else {
            return Ok(Vec::new());
        };

        let unreadable = |e: calamine::XlsxError| AppError::unreadable(self.location(), e);
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(unreadable)?;

        let names = workbook.sheet_names();
        let Some(sheet) = names
            .iter()
            .find(|name| name.as_str() == SHEET_NAME)
            .or_else(|| names.first())
            .cloned()
        else {
            return Ok(Vec::new());
        };
        let range = workbook.worksheet_range(&sheet).map_err(unreadable)?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        // Accept the older column names too
        let columns: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let name = match text_cell(Some(cell)).trim() {
                    "vac_id" => "id".to_string(),
                    "salary_from" => "min_salary".to_string(),
                    "salary_to" => "max_salary".to_string(),
                    other => other.to_string(),
                };
                (name, index)
            })
            .collect();

        if !columns.contains_key("id") {
            return Err(AppError::unreadable(self.location(), "no id column"));
        }

        let records = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| {
                let cell = |name: &str| columns.get(name).and_then(|&index| row.get(index));
                VacancyRecord {
                    id: text_cell(cell("id")),
                    name: text_cell(cell("name")),
                    url: text_cell(cell("url")),
                    min_salary: salary_cell(cell("min_salary")),
                    max_salary: salary_cell(cell("max_salary")),
                    employer_name: text_cell(cell("employer_name")),
                    employer_url: text_cell(cell("employer_url")),
                    requirements: text_cell(cell("requirements")),
                    area: text_cell(cell("area")),
                }
            })
            .collect();

        Ok(records)
    }

    fn write_all(&self, records: &[VacancyRecord]) -> Result<()> {
        let bytes = Self::render(records)?;
        local::write_atomic(&self.path, &bytes)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
