//! Выбор дат: `2025-09-10`, `2025-09-10,2025-09-12`, `2025-09-10..2025-09-19`,
//! `all` или `*`.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{BufRead, Write},
};

use chrono::NaiveDate;

use crate::{ConverterError, ConverterResult};

/// Формат даты в выборе и ключах группировки
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> ConverterResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| ConverterError::InvalidSelection(format!("'{value}': {e}")))
}

/// Все даты диапазона включительно. Перевёрнутый диапазон меняется местами.
pub fn expand_date_range(
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<String> {
    let (start, end) = if end < start { (end, start) } else { (start, end) };

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect()
}

/// Разбирает строку выбора дат. Даты, которых нет среди `available`,
/// остаются в результате, их отсеивает вызывающий.
pub fn parse_date_selection(
    selection: &str,
    available: &BTreeSet<String>,
) -> ConverterResult<BTreeSet<String>> {
    let raw = selection.trim();

    if raw.is_empty() {
        return Err(ConverterError::InvalidSelection("no dates provided".to_string()));
    }

    if raw.eq_ignore_ascii_case("all") || raw == "*" {
        return Ok(available.clone());
    }

    let mut selected = BTreeSet::new();

    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once("..") {
            Some((start, end)) => {
                let start = parse_date(start.trim())?;
                let end = parse_date(end.trim())?;
                selected.extend(expand_date_range(start, end));
            }
            None => {
                selected.insert(parse_date(part)?.format(DATE_FORMAT).to_string());
            }
        }
    }

    Ok(selected)
}

/// Делит выбор на присутствующие и отсутствующие в `available` даты.
pub fn retain_available<V>(
    selected: BTreeSet<String>,
    available: &BTreeMap<String, V>,
) -> (BTreeSet<String>, Vec<String>) {
    let (present, missing): (BTreeSet<String>, BTreeSet<String>) =
        selected.into_iter().partition(|d| available.contains_key(d));

    (present, missing.into_iter().collect())
}

/// Интерактивный выбор дат. Повторяет вопрос, пока не получит непустой
/// выбор из доступных дат. EOF на входе считается ошибкой.
pub fn prompt_for_dates<T, R: BufRead, W: Write>(
    available: &BTreeMap<String, Vec<T>>,
    input: &mut R,
    output: &mut W,
) -> ConverterResult<BTreeSet<String>> {
    if available.is_empty() {
        return Err(ConverterError::InvalidSelection(
            "no LBY files found in input directory".to_string(),
        ));
    }

    writeln!(output, "Available dates:")?;
    for (date, files) in available {
        writeln!(output, "  {date} ({} files)", files.len())?;
    }

    let keys: BTreeSet<String> = available.keys().cloned().collect();

    loop {
        write!(
            output,
            "Select dates (comma list, range 2025-09-10..2025-09-19, or 'all'): "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConverterError::InvalidSelection("input closed".to_string()));
        }

        let selected = match parse_date_selection(&line, &keys) {
            Ok(s) => s,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        let (present, missing) = retain_available(selected, available);
        if !missing.is_empty() {
            writeln!(
                output,
                "These dates have no files and will be ignored: {}",
                missing.join(", ")
            )?;
        }

        if present.is_empty() {
            writeln!(output, "No matching dates selected.")?;
            continue;
        }

        return Ok(present);
    }
}
