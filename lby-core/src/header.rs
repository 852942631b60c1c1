//! Дата и время записи из заголовка LBY.
//!
//! Раскладка полей (фиксированная):
//! ```text
//! [5]      MINUTE  u8   0..=59
//! [6]      HOUR    u8   0..=23
//! [8]      DAY     u8   1..=31
//! [9]      MONTH   u8   1..=12
//! [10..12] YEAR    u16  LBY_MIN_YEAR..=max_year, little-endian
//! ```
//! Прибор пишет местное время, поэтому значение переводится в UTC по
//! правилам часового пояса, действовавшим на дату записи.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

use crate::binary::read_u16_le;

/// Минимальная длина заголовка, содержащего дату
pub const LBY_HEADER_MIN_LEN: usize = 12;

pub const LBY_MINUTE_OFFSET: usize = 5;
pub const LBY_HOUR_OFFSET: usize = 6;
pub const LBY_DAY_OFFSET: usize = 8;
pub const LBY_MONTH_OFFSET: usize = 9;
pub const LBY_YEAR_OFFSET: usize = 10;

/// Нижняя граница допустимого года
pub const LBY_MIN_YEAR: u16 = 2020;

/// Верхняя граница допустимого года по умолчанию
pub const LBY_DEFAULT_MAX_YEAR: u16 = 2035;

/// Минимальная длина печатной ASCII-строки в заголовке
pub const LBY_MIN_ASCII_RUN: usize = 4;

/// Сырые поля даты из заголовка (местное время прибора).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl HeaderFields {
    /// Читает поля и проверяет диапазоны. Частичных результатов нет: если
    /// хотя бы одно поле вне диапазона, возвращается `None`.
    pub fn parse(
        header: &[u8],
        max_year: u16,
    ) -> Option<Self> {
        if header.len() < LBY_HEADER_MIN_LEN {
            return None;
        }

        let mut off = LBY_YEAR_OFFSET;
        let fields = HeaderFields {
            minute: header[LBY_MINUTE_OFFSET],
            hour: header[LBY_HOUR_OFFSET],
            day: header[LBY_DAY_OFFSET],
            month: header[LBY_MONTH_OFFSET],
            year: read_u16_le(header, &mut off)?,
        };

        fields.in_range(max_year).then_some(fields)
    }

    fn in_range(
        &self,
        max_year: u16,
    ) -> bool {
        self.minute <= 59
            && self.hour <= 23
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && (LBY_MIN_YEAR..=max_year).contains(&self.year)
    }

    /// Наивное местное время (секунды = 0). `None` для несуществующей даты
    /// вроде 31 февраля.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            0,
        )
    }

    /// Перевод в UTC по правилам часового пояса `tz` на дату записи.
    pub fn to_utc<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Option<DateTime<Utc>> {
        local_to_utc(&self.to_naive()?, tz)
    }
}

/// Переводит наивное местное время в UTC.
///
/// Неоднозначное время (осенний перевод часов) берётся по самому раннему
/// моменту в UTC. Время внутри весеннего разрыва трактуется со смещением,
/// действовавшим до перехода.
pub fn local_to_utc<Tz: TimeZone>(
    naive: &NaiveDateTime,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    if let Some(utc) = earliest_utc(tz.from_local_datetime(naive)) {
        return Some(utc);
    }

    let hour = TimeDelta::hours(1);
    let before = naive.checked_sub_signed(hour)?;

    earliest_utc(tz.from_local_datetime(&before))?.checked_add_signed(hour)
}

/// Самый ранний момент в UTC. Порядок вариантов в `Ambiguous` зависит от
/// реализации `TimeZone`, поэтому сравниваются оба.
fn earliest_utc<Tz: TimeZone>(local: LocalResult<DateTime<Tz>>) -> Option<DateTime<Utc>> {
    match local {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(a, b) => Some(a.with_timezone(&Utc).min(b.with_timezone(&Utc))),
        LocalResult::None => None,
    }
}

/// Декодирует дату записи из заголовка и переводит её в UTC.
///
/// `None` означает «не найдено»: короткий заголовок, поле вне диапазона,
/// несуществующая дата. Вызывающий сам решает, чем её заменить.
pub fn decode_header_timestamp<Tz: TimeZone>(
    header: &[u8],
    max_year: u16,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    HeaderFields::parse(header, max_year)?.to_utc(tz)
}

/// Печатные ASCII-строки заголовка длиной от [`LBY_MIN_ASCII_RUN`] символов.
pub fn header_strings(header: &[u8]) -> Vec<String> {
    header
        .split(|b| !(0x20..=0x7E).contains(b))
        .filter(|run| run.len() >= LBY_MIN_ASCII_RUN)
        .map(|run| String::from_utf8_lossy(run).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use chrono_tz::{America::New_York, Europe::Berlin, Tz};

    use super::*;

    fn header(
        minute: u8,
        hour: u8,
        day: u8,
        month: u8,
        year: u16,
    ) -> Vec<u8> {
        let mut h = vec![0u8; 64];
        h[LBY_MINUTE_OFFSET] = minute;
        h[LBY_HOUR_OFFSET] = hour;
        h[LBY_DAY_OFFSET] = day;
        h[LBY_MONTH_OFFSET] = month;
        h[LBY_YEAR_OFFSET..LBY_YEAR_OFFSET + 2].copy_from_slice(&year.to_le_bytes());
        h
    }

    #[test]
    fn test_short_header_not_found() {
        for len in 0..LBY_HEADER_MIN_LEN {
            let h = vec![1u8; len];
            assert_eq!(decode_header_timestamp(&h, LBY_DEFAULT_MAX_YEAR, &Utc), None);
        }
    }

    #[test]
    fn test_decode_utc_zone() {
        let h = header(30, 14, 10, 9, 2025);
        assert_eq!(&h[10..12], &[0xE9, 0x07]);

        let ts = decode_header_timestamp(&h, LBY_DEFAULT_MAX_YEAR, &Utc).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 10, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_decode_applies_zone_offset() {
        let msk = FixedOffset::east_opt(3 * 3600).unwrap();
        let ts = decode_header_timestamp(&header(30, 14, 10, 9, 2025), 2035, &msk).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 9, 10, 11, 30, 0).unwrap());

        let pdt = FixedOffset::west_opt(7 * 3600).unwrap();
        let ts = decode_header_timestamp(&header(30, 20, 31, 12, 2025), 2035, &pdt).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 1, 1, 3, 30, 0).unwrap());
    }

    #[test]
    fn test_any_field_out_of_range_rejects_all() {
        let bad = [
            header(60, 14, 10, 9, 2025),
            header(30, 24, 10, 9, 2025),
            header(30, 25, 10, 9, 2025),
            header(30, 14, 0, 9, 2025),
            header(30, 14, 32, 9, 2025),
            header(30, 14, 10, 0, 2025),
            header(30, 14, 10, 13, 2025),
            header(30, 14, 10, 9, 2019),
            header(30, 14, 10, 9, 2036),
        ];

        for h in &bad {
            assert_eq!(HeaderFields::parse(h, LBY_DEFAULT_MAX_YEAR), None);
            assert_eq!(decode_header_timestamp(h, LBY_DEFAULT_MAX_YEAR, &Utc), None);
        }
    }

    #[test]
    fn test_field_bounds_inclusive() {
        let lo = header(0, 0, 1, 1, LBY_MIN_YEAR);
        let hi = header(59, 23, 31, 12, LBY_DEFAULT_MAX_YEAR);

        assert!(decode_header_timestamp(&lo, LBY_DEFAULT_MAX_YEAR, &Utc).is_some());
        assert!(decode_header_timestamp(&hi, LBY_DEFAULT_MAX_YEAR, &Utc).is_some());
    }

    #[test]
    fn test_max_year_is_configurable() {
        let h = header(0, 12, 1, 6, 2032);

        assert!(decode_header_timestamp(&h, 2035, &Utc).is_some());
        assert_eq!(decode_header_timestamp(&h, 2030, &Utc), None);
    }

    #[test]
    fn test_impossible_calendar_date_not_found() {
        let h = header(0, 12, 31, 2, 2025);

        assert!(HeaderFields::parse(&h, LBY_DEFAULT_MAX_YEAR).is_some());
        assert_eq!(decode_header_timestamp(&h, LBY_DEFAULT_MAX_YEAR, &Utc), None);
    }

    #[test]
    fn test_local_zone_decodes() {
        let ts = decode_header_timestamp(&header(30, 14, 10, 9, 2025), 2035, &chrono::Local);
        assert!(ts.is_some());
    }

    #[test]
    fn test_dst_summer_and_winter_offsets() {
        let summer = decode_header_timestamp(&header(30, 14, 10, 7, 2025), 2035, &New_York);
        assert_eq!(summer, Some(Utc.with_ymd_and_hms(2025, 7, 10, 18, 30, 0).unwrap()));

        let winter = decode_header_timestamp(&header(30, 14, 10, 1, 2025), 2035, &New_York);
        assert_eq!(winter, Some(Utc.with_ymd_and_hms(2025, 1, 10, 19, 30, 0).unwrap()));
    }

    #[test]
    fn test_dst_fall_back_takes_earliest_instant() {
        // 01:30 2 ноября 2025 встречается дважды: EDT (05:30Z) и EST (06:30Z)
        let ts = decode_header_timestamp(&header(30, 1, 2, 11, 2025), 2035, &New_York);
        assert_eq!(ts, Some(Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap()));

        let ts = decode_header_timestamp(&header(30, 2, 26, 10, 2025), 2035, &Berlin);
        assert_eq!(ts, Some(Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap()));
    }

    #[test]
    fn test_dst_spring_forward_gap() {
        // 02:30 9 марта 2025 не существует, берётся смещение EST
        let ts = decode_header_timestamp(&header(30, 2, 9, 3, 2025), 2035, &New_York);
        assert_eq!(ts, Some(Utc.with_ymd_and_hms(2025, 3, 9, 7, 30, 0).unwrap()));
    }

    #[test]
    fn test_ambiguous_order_does_not_matter() {
        let naive = NaiveDate::from_ymd_opt(2025, 11, 2)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap();

        assert_eq!(local_to_utc(&naive, &New_York), Some(expected));
        assert_eq!(local_to_utc(&naive, &SwappedAmbiguity(New_York)), Some(expected));
    }

    /// Часовой пояс, отдающий варианты Ambiguous в обратном порядке.
    #[derive(Debug, Clone, Copy)]
    struct SwappedAmbiguity(Tz);

    impl TimeZone for SwappedAmbiguity {
        type Offset = <Tz as TimeZone>::Offset;

        fn from_offset(offset: &Self::Offset) -> Self {
            SwappedAmbiguity(Tz::from_offset(offset))
        }

        fn offset_from_local_date(
            &self,
            local: &NaiveDate,
        ) -> LocalResult<Self::Offset> {
            self.0.offset_from_local_date(local)
        }

        fn offset_from_local_datetime(
            &self,
            local: &NaiveDateTime,
        ) -> LocalResult<Self::Offset> {
            match self.0.offset_from_local_datetime(local) {
                LocalResult::Ambiguous(a, b) => LocalResult::Ambiguous(b, a),
                other => other,
            }
        }

        fn offset_from_utc_date(
            &self,
            utc: &NaiveDate,
        ) -> Self::Offset {
            self.0.offset_from_utc_date(utc)
        }

        fn offset_from_utc_datetime(
            &self,
            utc: &NaiveDateTime,
        ) -> Self::Offset {
            self.0.offset_from_utc_datetime(utc)
        }
    }

    #[test]
    fn test_header_strings() {
        let mut h = vec![0u8; 40];
        h[12..18].copy_from_slice(b"HCV5S ");
        h[20..23].copy_from_slice(b"abc");
        h[25..33].copy_from_slice(b"FW 1.2.3");

        assert_eq!(header_strings(&h), vec!["HCV5S ".to_string(), "FW 1.2.3".to_string()]);
        assert!(header_strings(&[]).is_empty());
    }
}
