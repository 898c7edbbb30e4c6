use core::fmt;

use chrono::{DateTime, Utc};

use crate::error::FruError;
use crate::fru::checksum;

/// Type/length byte that ends a field list.
pub const END_OF_FIELDS: u8 = 0xC1;

/// Longest value a type/length byte can describe.
pub const MAX_FIELD_LEN: usize = 0x3F;

/// 1996-01-01T00:00:00Z as seconds since the Unix epoch.
const MFG_EPOCH_SECS: i64 = 820_454_400;

/// Encoding selected by the top two bits of a type/length byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldType {
    /// Binary or unspecified.
    Binary = 0b00,
    /// BCD plus.
    BcdPlus = 0b01,
    /// 6-bit packed ASCII.
    SixBitAscii = 0b10,
    /// 8-bit ASCII + Latin 1, interpreted per language code.
    Ascii8 = 0b11,
}

impl FieldType {
    fn from_type_length(byte: u8) -> Self {
        match byte >> 6 {
            0b00 => Self::Binary,
            0b01 => Self::BcdPlus,
            0b10 => Self::SixBitAscii,
            _ => Self::Ascii8,
        }
    }
}

/// A field value decoded as far as this crate supports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// English 8-bit ASCII, trimmed of surrounding whitespace.
    Text(String),
    /// Binary data.
    Binary(Vec<u8>),
    /// An encoding without character-set support (BCD plus, 6-bit packed
    /// ASCII, or 8-bit ASCII in a non-English language). Raw bytes.
    Unsupported {
        /// Encoding of the field.
        field_type: FieldType,
        /// Undecoded bytes.
        raw: Vec<u8>,
    },
}

impl FieldValue {
    /// The text, if the field decoded to text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Binary(raw) => write!(f, "0x{}", hex::encode(raw)),
            Self::Unsupported { field_type, raw } => {
                write!(f, "Type: {field_type:?}, Hex: {}", hex::encode(raw))
            }
        }
    }
}

/// One variable-length field of an info area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FruField {
    /// Encoding.
    pub field_type: FieldType,
    /// Raw bytes (0-63).
    pub data: Vec<u8>,
}

impl FruField {
    /// An 8-bit ASCII field.
    pub fn ascii(text: &str) -> Result<Self, FruError> {
        if text.len() > MAX_FIELD_LEN {
            return Err(FruError::FieldTooLong(text.len()));
        }
        Ok(Self {
            field_type: FieldType::Ascii8,
            data: text.as_bytes().to_vec(),
        })
    }

    /// Type/length byte followed by the data.
    pub fn encode(&self) -> Vec<u8> {
        let len = self.data.len().min(MAX_FIELD_LEN);
        let mut out = Vec::with_capacity(len + 1);
        out.push(((self.field_type as u8) << 6) | len as u8);
        out.extend_from_slice(&self.data[..len]);
        out
    }

    /// Decode the value under `language` (0 and 25 are English).
    pub fn value(&self, language: u8) -> FieldValue {
        match self.field_type {
            FieldType::Binary => FieldValue::Binary(self.data.clone()),
            FieldType::Ascii8 if language == 0 || language == 25 => {
                FieldValue::Text(String::from_utf8_lossy(&self.data).trim().to_string())
            }
            field_type => FieldValue::Unsupported {
                field_type,
                raw: self.data.clone(),
            },
        }
    }
}

/// Decode the 3-byte little-endian manufacture date (minutes since
/// 1996-01-01T00:00:00Z).
pub fn manufacture_date(bytes: [u8; 3]) -> DateTime<Utc> {
    let minutes = i64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]));
    DateTime::from_timestamp(MFG_EPOCH_SECS + minutes * 60, 0).unwrap_or_default()
}

/// Validate an info area header and return the area bytes.
///
/// `fields_start` is the offset of the first type/length byte.
fn area_bytes<'a>(
    area: &'static str,
    buf: &'a [u8],
    fields_start: usize,
) -> Result<&'a [u8], FruError> {
    if buf.len() < 2 {
        return Err(FruError::AreaTooShort {
            area,
            needed: 2,
            available: buf.len(),
        });
    }
    let version = buf[0] & 0x0F;
    let size = usize::from(buf[1]) * 8;
    if size > buf.len() {
        return Err(FruError::AreaLength {
            area,
            declared: size,
            available: buf.len(),
        });
    }
    if version != 0x01 {
        return Err(FruError::AreaVersion { area, version });
    }
    if fields_start >= size {
        return Err(FruError::NoFields {
            area,
            length: size,
            fields_start,
        });
    }
    Ok(&buf[..size])
}

/// Parse type/length fields from `start` until `0xC1` or the area boundary.
///
/// A zero-length binary field (`0x00`) is skipped. A field that would run
/// past the area ends the list without error.
pub(crate) fn parse_fields(area: &[u8], start: usize) -> Vec<FruField> {
    let mut fields = Vec::new();
    let mut idx = start;
    while idx < area.len() {
        let type_length = area[idx];
        idx += 1;
        if type_length == END_OF_FIELDS {
            break;
        }
        if type_length == 0x00 {
            continue;
        }

        let end = idx + usize::from(type_length & 0x3F);
        if end > area.len() {
            break;
        }
        fields.push(FruField {
            field_type: FieldType::from_type_length(type_length),
            data: area[idx..end].to_vec(),
        });
        idx = end;
    }
    fields
}

/// Trailing checksum byte and the checksum computed over the rest.
fn area_checksum(area: &[u8]) -> (u8, u8) {
    let (stored, body) = area.split_last().map_or((0, area), |(last, body)| (*last, body));
    (stored, checksum(body))
}

/// Board Info Area.
///
/// The trailing checksum is recorded but not enforced; see
/// [`checksum_valid`](Self::checksum_valid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardInfoArea {
    /// Format version (1).
    pub version: u8,
    /// Area length in 8-byte units.
    pub length: u8,
    /// Language code.
    pub language: u8,
    /// Manufacture date and time.
    pub manufactured: DateTime<Utc>,
    /// Fields in area order.
    pub fields: Vec<FruField>,
    /// Trailing checksum byte.
    pub checksum: u8,
    computed: u8,
}

impl BoardInfoArea {
    const NAME: &'static str = "Board Info";
    const FIELDS_START: usize = 6;

    /// Decode the area at the start of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, FruError> {
        let area = area_bytes(Self::NAME, buf, Self::FIELDS_START)?;
        let (checksum, computed) = area_checksum(area);
        Ok(Self {
            version: area[0] & 0x0F,
            length: area[1],
            language: area[2],
            manufactured: manufacture_date([area[3], area[4], area[5]]),
            fields: parse_fields(area, Self::FIELDS_START),
            checksum,
            computed,
        })
    }

    /// `true` when the trailing checksum matches the area content.
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.computed
    }

    /// Decoded value of the field at `index`.
    pub fn field(&self, index: usize) -> Option<FieldValue> {
        self.fields.get(index).map(|f| f.value(self.language))
    }

    /// Board manufacturer.
    pub fn manufacturer(&self) -> Option<FieldValue> {
        self.field(0)
    }

    /// Board product name.
    pub fn product_name(&self) -> Option<FieldValue> {
        self.field(1)
    }

    /// Board serial number.
    pub fn serial_number(&self) -> Option<FieldValue> {
        self.field(2)
    }

    /// Board part number.
    pub fn part_number(&self) -> Option<FieldValue> {
        self.field(3)
    }

    /// FRU file ID.
    pub fn fru_file_id(&self) -> Option<FieldValue> {
        self.field(4)
    }

    /// Custom manufacturer fields.
    pub fn custom_fields(&self) -> impl Iterator<Item = FieldValue> + '_ {
        self.fields.iter().skip(5).map(|f| f.value(self.language))
    }
}

impl fmt::Display for BoardInfoArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:<22}: {}",
            "Board Mfg Date",
            self.manufactured.format("%Y-%m-%d %H:%M:%S")
        )?;
        let slots = [
            "Board Mfg",
            "Board Product",
            "Board Serial",
            "Board Part Number",
            "Board FRU File ID",
        ];
        write_fields(f, &slots, &self.fields, self.language)
    }
}

/// Product Info Area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfoArea {
    /// Format version (1).
    pub version: u8,
    /// Area length in 8-byte units.
    pub length: u8,
    /// Language code.
    pub language: u8,
    /// Fields in area order.
    pub fields: Vec<FruField>,
    /// Trailing checksum byte.
    pub checksum: u8,
    computed: u8,
}

impl ProductInfoArea {
    const NAME: &'static str = "Product Info";
    const FIELDS_START: usize = 3;

    /// Decode the area at the start of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, FruError> {
        let area = area_bytes(Self::NAME, buf, Self::FIELDS_START)?;
        let (checksum, computed) = area_checksum(area);
        Ok(Self {
            version: area[0] & 0x0F,
            length: area[1],
            language: area[2],
            fields: parse_fields(area, Self::FIELDS_START),
            checksum,
            computed,
        })
    }

    /// `true` when the trailing checksum matches the area content.
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.computed
    }

    /// Decoded value of the field at `index`.
    pub fn field(&self, index: usize) -> Option<FieldValue> {
        self.fields.get(index).map(|f| f.value(self.language))
    }

    /// Manufacturer name.
    pub fn manufacturer(&self) -> Option<FieldValue> {
        self.field(0)
    }

    /// Product name.
    pub fn name(&self) -> Option<FieldValue> {
        self.field(1)
    }

    /// Part/model number.
    pub fn part_number(&self) -> Option<FieldValue> {
        self.field(2)
    }

    /// Product version.
    pub fn version_field(&self) -> Option<FieldValue> {
        self.field(3)
    }

    /// Product serial number.
    pub fn serial_number(&self) -> Option<FieldValue> {
        self.field(4)
    }

    /// Asset tag.
    pub fn asset_tag(&self) -> Option<FieldValue> {
        self.field(5)
    }

    /// FRU file ID.
    pub fn fru_file_id(&self) -> Option<FieldValue> {
        self.field(6)
    }

    /// Custom manufacturer fields.
    pub fn custom_fields(&self) -> impl Iterator<Item = FieldValue> + '_ {
        self.fields.iter().skip(7).map(|f| f.value(self.language))
    }
}

impl fmt::Display for ProductInfoArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = [
            "Product Manufacturer",
            "Product Name",
            "Product Part Number",
            "Product Version",
            "Product Serial",
            "Product Asset Tag",
            "Product FRU File ID",
        ];
        write_fields(f, &slots, &self.fields, self.language)
    }
}

/// Chassis Info Area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisInfoArea {
    /// Format version (1).
    pub version: u8,
    /// Area length in 8-byte units.
    pub length: u8,
    /// SMBIOS chassis type.
    pub chassis_type: u8,
    /// Fields in area order.
    pub fields: Vec<FruField>,
    /// Trailing checksum byte.
    pub checksum: u8,
    computed: u8,
}

impl ChassisInfoArea {
    const NAME: &'static str = "Chassis Info";
    const FIELDS_START: usize = 3;

    /// Decode the area at the start of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self, FruError> {
        let area = area_bytes(Self::NAME, buf, Self::FIELDS_START)?;
        let (checksum, computed) = area_checksum(area);
        Ok(Self {
            version: area[0] & 0x0F,
            length: area[1],
            chassis_type: area[2],
            fields: parse_fields(area, Self::FIELDS_START),
            checksum,
            computed,
        })
    }

    /// `true` when the trailing checksum matches the area content.
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.computed
    }

    /// Decoded value of the field at `index`. Chassis fields are always
    /// interpreted as English.
    pub fn field(&self, index: usize) -> Option<FieldValue> {
        self.fields.get(index).map(|f| f.value(0))
    }

    /// Chassis part number.
    pub fn part_number(&self) -> Option<FieldValue> {
        self.field(0)
    }

    /// Chassis serial number.
    pub fn serial_number(&self) -> Option<FieldValue> {
        self.field(1)
    }

    /// Custom manufacturer fields.
    pub fn custom_fields(&self) -> impl Iterator<Item = FieldValue> + '_ {
        self.fields.iter().skip(2).map(|f| f.value(0))
    }

    /// Chassis type name.
    pub fn chassis_type_name(&self) -> &'static str {
        CHASSIS_TYPES
            .get(usize::from(self.chassis_type))
            .copied()
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for ChassisInfoArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {:<22}: {}", "Chassis Type", self.chassis_type_name())?;
        write_fields(f, &["Chassis Part Number", "Chassis Serial"], &self.fields, 0)
    }
}

fn write_fields(
    f: &mut fmt::Formatter<'_>,
    slots: &[&str],
    fields: &[FruField],
    language: u8,
) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        let value = field.value(language);
        match slots.get(i) {
            Some(slot) => writeln!(f, "  {slot:<22}: {value}")?,
            None => {
                let slot = format!("Custom Field #{}", i - slots.len() + 1);
                writeln!(f, "  {slot:<22}: {value}")?;
            }
        }
    }
    Ok(())
}

const CHASSIS_TYPES: &[&str] = &[
    "Unspecified",
    "Other",
    "Unknown",
    "Desktop",
    "Low Profile Desktop",
    "Pizza Box",
    "Mini Tower",
    "Tower",
    "Portable",
    "LapTop",
    "Notebook",
    "Hand Held",
    "Docking Station",
    "All in One",
    "Sub Notebook",
    "Space-saving",
    "Lunch Box",
    "Main Server Chassis",
    "Expansion Chassis",
    "SubChassis",
    "Bus Expansion Chassis",
    "Peripheral Chassis",
    "RAID Chassis",
    "Rack Mount Chassis",
    "Sealed-case PC",
    "Multi-system Chassis",
    "Compact PCI",
    "Advanced TCA",
    "Blade",
    "Blade Enclosure",
    "Tablet",
    "Convertible",
    "Detachable",
    "IoT Gateway",
    "Embedded PC",
    "Mini PC",
    "Stick PC",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn area(fixed: &[u8], fields: &[u8], units: u8) -> Vec<u8> {
        let mut buf = fixed.to_vec();
        buf[1] = units;
        buf.extend_from_slice(fields);
        let size = usize::from(units) * 8;
        buf.resize(size - 1, 0x00);
        buf.push(checksum(&buf));
        buf
    }

    #[test]
    fn terminator_stops_field_list() {
        let mut fields = FruField::ascii("ACME").expect("field").encode();
        fields.push(END_OF_FIELDS);
        fields.extend(FruField::ascii("IGNORED").expect("field").encode());
        let buf = area(&[0x01, 0, 0], &fields, 3);

        let product = ProductInfoArea::decode(&buf).expect("decode");
        assert_eq!(product.fields.len(), 1);
        assert_eq!(product.manufacturer(), Some(FieldValue::Text("ACME".into())));
        assert!(product.checksum_valid());
    }

    #[test]
    fn empty_binary_is_skipped_but_empty_text_is_kept() {
        let buf = area(&[0x01, 0, 0], &[0x00, 0xC0, 0xC2, b'A', b'B', END_OF_FIELDS], 2);
        let product = ProductInfoArea::decode(&buf).expect("decode");
        assert_eq!(product.fields.len(), 2);
        assert_eq!(product.field(0), Some(FieldValue::Text(String::new())));
        assert_eq!(product.field(1), Some(FieldValue::Text("AB".into())));
    }

    #[test]
    fn overrunning_field_ends_list() {
        let buf = area(&[0x01, 0, 0], &[0xC2, b'O', b'K', 0xFF], 2);
        let product = ProductInfoArea::decode(&buf).expect("decode");
        assert_eq!(product.fields.len(), 1);
    }

    #[test]
    fn non_english_and_packed_fields_are_unsupported() {
        let field = FruField {
            field_type: FieldType::Ascii8,
            data: b"abc".to_vec(),
        };
        assert_eq!(field.value(25), FieldValue::Text("abc".into()));
        assert!(matches!(
            field.value(3),
            FieldValue::Unsupported {
                field_type: FieldType::Ascii8,
                ..
            }
        ));
        let bcd = FruField {
            field_type: FieldType::BcdPlus,
            data: vec![0x12],
        };
        assert!(matches!(bcd.value(0), FieldValue::Unsupported { .. }));
    }

    #[test]
    fn area_errors() {
        let err = BoardInfoArea::decode(&[0x01]).expect_err("too short");
        assert!(matches!(err, FruError::AreaTooShort { .. }));

        let err = BoardInfoArea::decode(&[0x01, 0x04, 0, 0]).expect_err("too long");
        assert!(matches!(err, FruError::AreaLength { declared: 32, .. }));

        let err = BoardInfoArea::decode(&[0x02, 0x01, 0, 0, 0, 0, 0, 0]).expect_err("version");
        assert!(matches!(err, FruError::AreaVersion { version: 2, .. }));
    }

    #[test]
    fn corrupted_area_checksum_is_reported_not_enforced() {
        let mut buf = area(&[0x01, 0, 0x17], &[0xC1], 1);
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        let chassis = ChassisInfoArea::decode(&buf).expect("decode");
        assert!(!chassis.checksum_valid());
        assert_eq!(chassis.chassis_type_name(), "Rack Mount Chassis");
    }

    #[test]
    fn field_too_long() {
        let text = "x".repeat(64);
        assert_eq!(FruField::ascii(&text), Err(FruError::FieldTooLong(64)));
    }
}
