/// Register value interpretation, spelled the way fixture files spell it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bitfield,
    Bool,
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Float32,
    Float64,
    String,
}

/// Byte permutation code describing how raw wire bytes assemble into a
/// value. The letter count matches the value width: `AB` permutes two
/// bytes, `ABCDEFGH` eight.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, strum::Display, strum::EnumString,
)]
pub enum DataOrder {
    A,
    AB,
    BA,
    ABCD,
    DCBA,
    BADC,
    CDAB,
    ABCDEFGH,
    HGFEDCBA,
}

impl DataOrder {
    pub const fn bytes(self) -> usize {
        match self {
            Self::A => 1,
            Self::AB | Self::BA => 2,
            Self::ABCD | Self::DCBA | Self::BADC | Self::CDAB => 4,
            Self::ABCDEFGH | Self::HGFEDCBA => 8,
        }
    }
}

/// Modbus read function carried by a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
#[repr(u8)]
pub enum FunctionCode {
    ReadCoils = 1,
    ReadDiscreteInputs = 2,
    ReadHoldingRegisters = 3,
    ReadInputRegisters = 4,
}

impl FunctionCode {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl serde::Serialize for FunctionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl std::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.code()))
    }
}

/// How many 16-bit words a register of some data type occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Words(u16),
    /// Any count in `1..=max`. Strings have no fixed width.
    UpTo(u16),
}

pub struct TypeSpec {
    pub orders: &'static [DataOrder],
    pub quantity: Quantity,
}

impl DataType {
    /// The closed mapping from data type to permitted byte orders and word
    /// count. A byte order is only physically meaningful for the width it
    /// permutes, so widening a type without extending its order set here
    /// would make fixtures unparseable.
    pub const fn spec(self) -> TypeSpec {
        use DataOrder::*;
        match self {
            Self::Uint8 | Self::Int8 => TypeSpec {
                orders: &[A],
                quantity: Quantity::Words(1),
            },
            Self::Uint16 | Self::Int16 => TypeSpec {
                orders: &[AB, BA],
                quantity: Quantity::Words(1),
            },
            Self::Uint32 | Self::Int32 | Self::Float32 => TypeSpec {
                orders: &[ABCD, DCBA, BADC, CDAB],
                quantity: Quantity::Words(2),
            },
            Self::Float64 => TypeSpec {
                orders: &[ABCDEFGH, HGFEDCBA],
                quantity: Quantity::Words(4),
            },
            // The order column is carried but ignored for strings.
            Self::String => TypeSpec {
                orders: &[ABCD],
                quantity: Quantity::UpTo(4),
            },
            Self::Bitfield | Self::Bool => TypeSpec {
                orders: &[AB],
                quantity: Quantity::Words(1),
            },
        }
    }

    pub fn permits(self, order: DataOrder) -> bool {
        self.spec().orders.contains(&order)
    }
}

/// One generated register description: address, type, and the decoding
/// parameters a consumer needs to poll and parse it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterDescriptor {
    pub tag: String,
    pub alias: String,
    pub slaver_id: u8,
    pub function: FunctionCode,
    pub read_address: u16,
    pub read_quantity: u16,
    pub data_type: DataType,
    pub data_order: DataOrder,
    pub bit_position: u8,
    pub bit_mask: u16,
    pub weight: f64,
    pub frequency: u32,
}

impl RegisterDescriptor {
    /// Column order of the fixture file. Consumers match on these names.
    pub const COLUMNS: [&'static str; 12] = [
        "Tag",
        "Alias",
        "SlaverId",
        "Function",
        "ReadAddress",
        "ReadQuantity",
        "DataType",
        "DataOrder",
        "BitPosition",
        "BitMask",
        "Weight",
        "Frequency",
    ];

    pub fn row(&self) -> Vec<String> {
        vec![
            self.tag.clone(),
            self.alias.clone(),
            self.slaver_id.to_string(),
            self.function.to_string(),
            self.read_address.to_string(),
            self.read_quantity.to_string(),
            self.data_type.to_string(),
            self.data_order.to_string(),
            self.bit_position.to_string(),
            self.bit_mask.to_string(),
            self.weight.to_string(),
            self.frequency.to_string(),
        ]
    }

    /// Cross-field consistency required of every descriptor: byte order
    /// permitted for the data type, word count matching the type table,
    /// bit mask derived from the bit position.
    pub fn is_consistent(&self) -> bool {
        if !self.data_type.permits(self.data_order) {
            return false;
        }
        let quantity_ok = match self.data_type.spec().quantity {
            Quantity::Words(words) => self.read_quantity == words,
            Quantity::UpTo(max) => (1..=max).contains(&self.read_quantity),
        };
        quantity_ok && self.bit_position <= 15 && self.bit_mask == 1u16 << self.bit_position
    }
}
