/// Разрядность слова полезной нагрузки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SampleWidth {
    /// 16-битные слова (результат схлопывания 32-битного потока)
    Bits16 = 16,
    /// 32-битные знаковые слова little-endian, формат по умолчанию
    #[default]
    Bits32 = 32,
}

impl SampleWidth {
    pub fn from_bits(v: u8) -> Option<Self> {
        match v {
            16 => Some(SampleWidth::Bits16),
            32 => Some(SampleWidth::Bits32),
            _ => None,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Размер одного слова в байтах
    pub fn word_size(&self) -> usize {
        match self {
            SampleWidth::Bits16 => 2,
            SampleWidth::Bits32 => 4,
        }
    }
}

impl std::fmt::Display for SampleWidth {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl std::str::FromStr for SampleWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_end_matches("-bit") {
            "16" | "i16" => Ok(SampleWidth::Bits16),
            "32" | "i32" => Ok(SampleWidth::Bits32),
            _ => Err(format!("Unknown sample width '{s}'. Use: 16, 32")),
        }
    }
}
