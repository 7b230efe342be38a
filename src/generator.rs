use rand::Rng;
use tracing::trace;

use crate::descriptor::{DataType, FunctionCode, Quantity, RegisterDescriptor};

/// Most descriptors one map can hold: the allocation rule consumes six
/// addresses per five records, exhausting the 16-bit space here.
pub const MAX_DESCRIPTORS: usize = 54_612;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// Every supported data type, randomized device and function fields.
    Full,
    /// Reduced fixture: 16/32-bit numerics only, fixed device and function,
    /// weights alternating between 1.0 and 0.1.
    Narrow,
}

impl Profile {
    pub fn data_types(self) -> &'static [DataType] {
        match self {
            Self::Full => &[
                DataType::Bitfield,
                DataType::Bool,
                DataType::Uint8,
                DataType::Int8,
                DataType::Uint16,
                DataType::Int16,
                DataType::Uint32,
                DataType::Int32,
                DataType::Float32,
                DataType::Float64,
                DataType::String,
            ],
            Self::Narrow => &[DataType::Int16, DataType::Int32, DataType::Float32],
        }
    }
}

const READ_FUNCTIONS: [FunctionCode; 4] = [
    FunctionCode::ReadCoils,
    FunctionCode::ReadDiscreteInputs,
    FunctionCode::ReadHoldingRegisters,
    FunctionCode::ReadInputRegisters,
];

/// Allocates strictly increasing read addresses: +1 per record, with a +2
/// gap on every 5th record modeling multi-word registers that occupy extra
/// slots in the map. Consumers of the fixture must cope with the resulting
/// non-contiguous address space.
#[derive(Debug)]
struct AddressCursor {
    address: u16,
    index: usize,
}

impl AddressCursor {
    fn new() -> Self {
        Self { address: 1, index: 0 }
    }

    fn advance(&mut self) -> Option<u16> {
        let step = if self.index > 0 && self.index % 5 == 0 { 2 } else { 1 };
        self.address = self.address.checked_add(step)?;
        self.index += 1;
        Some(self.address)
    }
}

/// Produces internally consistent register descriptors from an explicit
/// random source. Iteration ends when the address space is exhausted, after
/// [`MAX_DESCRIPTORS`] records; there is no other termination or failure
/// path.
pub struct Generator<R> {
    rng: R,
    profile: Profile,
    cursor: AddressCursor,
}

impl<R: Rng> Generator<R> {
    pub fn new(profile: Profile, rng: R) -> Self {
        Self {
            rng,
            profile,
            cursor: AddressCursor::new(),
        }
    }

    fn next_descriptor(&mut self) -> Option<RegisterDescriptor> {
        let index = self.cursor.index;
        let read_address = self.cursor.advance()?;

        let types = self.profile.data_types();
        let data_type = types[self.rng.gen_range(0..types.len())];
        let spec = data_type.spec();
        let data_order = spec.orders[self.rng.gen_range(0..spec.orders.len())];
        let read_quantity = match spec.quantity {
            Quantity::Words(words) => words,
            Quantity::UpTo(max) => self.rng.gen_range(1..=max),
        };

        let slaver_id: u8 = match self.profile {
            Profile::Full => self.rng.gen_range(1..=10),
            Profile::Narrow => 1,
        };
        let function = match self.profile {
            Profile::Full => READ_FUNCTIONS[self.rng.gen_range(0..READ_FUNCTIONS.len())],
            Profile::Narrow => FunctionCode::ReadHoldingRegisters,
        };
        let weight = match self.profile {
            Profile::Full => round_weight(self.rng.gen_range(0.1..10.0)),
            Profile::Narrow => {
                if index % 2 == 0 {
                    1.0
                } else {
                    0.1
                }
            }
        };

        let bit_position: u8 = self.rng.gen_range(0..=15);
        let descriptor = RegisterDescriptor {
            tag: format!("Tag_{index}"),
            alias: format!("Alias_{index}"),
            slaver_id,
            function,
            read_address,
            read_quantity,
            data_type,
            data_order,
            bit_position,
            bit_mask: 1u16 << bit_position,
            weight,
            frequency: self.rng.gen_range(10..=1000),
        };
        trace!(tag = %descriptor.tag, address = descriptor.read_address, "descriptor generated");
        Some(descriptor)
    }
}

impl<R: Rng> Iterator for Generator<R> {
    type Item = RegisterDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_descriptor()
    }
}

fn round_weight(weight: f64) -> f64 {
    (weight * 1000.0).round() / 1000.0
}

/// Whole fixture at once. Yields fewer than `n` descriptors only when `n`
/// exceeds [`MAX_DESCRIPTORS`].
pub fn generate<R: Rng>(profile: Profile, rng: R, n: usize) -> Vec<RegisterDescriptor> {
    Generator::new(profile, rng).take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DataOrder;
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use strum::IntoEnumIterator as _;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn yields_exactly_n_descriptors() {
        assert!(generate(Profile::Full, rng(0), 0).is_empty());
        assert_eq!(generate(Profile::Full, rng(0), 1).len(), 1);
        assert_eq!(generate(Profile::Full, rng(0), 937).len(), 937);
    }

    #[test]
    fn six_records_hit_the_first_address_gap() {
        let fixture = generate(Profile::Full, rng(1), 6);
        let addresses: Vec<u16> = fixture.iter().map(|d| d.read_address).collect();
        assert_eq!(addresses, [2, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn addresses_strictly_increase_with_fixed_gaps() {
        let fixture = generate(Profile::Full, rng(2), 500);
        for (i, pair) in fixture.windows(2).enumerate() {
            let gap = pair[1].read_address - pair[0].read_address;
            let expected = if (i + 1) % 5 == 0 { 2 } else { 1 };
            assert_eq!(gap, expected, "gap leading into record {}", i + 1);
        }
    }

    #[test]
    fn tags_and_aliases_number_the_records() {
        for (i, d) in generate(Profile::Full, rng(3), 20).iter().enumerate() {
            assert_eq!(d.tag, format!("Tag_{i}"));
            assert_eq!(d.alias, format!("Alias_{i}"));
        }
    }

    #[test]
    fn every_descriptor_is_tuple_consistent() {
        for seed in 0..4 {
            for d in generate(Profile::Full, rng(seed), 400) {
                assert!(d.is_consistent(), "{d:?}");
            }
        }
    }

    #[test]
    fn uint16_and_float64_follow_the_table() {
        let fixture = generate(Profile::Full, rng(4), 2000);
        for d in &fixture {
            match d.data_type {
                DataType::Uint16 => {
                    assert!(matches!(d.data_order, DataOrder::AB | DataOrder::BA));
                    assert_eq!(d.read_quantity, 1);
                }
                DataType::Float64 => {
                    assert!(matches!(
                        d.data_order,
                        DataOrder::ABCDEFGH | DataOrder::HGFEDCBA
                    ));
                    assert_eq!(d.read_quantity, 4);
                }
                DataType::String => {
                    assert_eq!(d.data_order, DataOrder::ABCD);
                    assert!((1..=4).contains(&d.read_quantity));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn bit_mask_is_derived_from_bit_position() {
        for d in generate(Profile::Full, rng(5), 300) {
            assert!(d.bit_position <= 15);
            assert_eq!(d.bit_mask, 1u16 << d.bit_position);
        }
    }

    #[test]
    fn auxiliary_fields_stay_in_range() {
        for d in generate(Profile::Full, rng(6), 300) {
            assert!((1..=10).contains(&d.slaver_id));
            assert!((1..=4).contains(&d.function.code()));
            assert!((0.1..=10.0).contains(&d.weight));
            assert!((10..=1000).contains(&d.frequency));
        }
    }

    #[test]
    fn same_seed_reproduces_the_fixture() {
        let a = generate(Profile::Full, rng(42), 64);
        let b = generate(Profile::Full, rng(42), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn narrow_profile_fixes_device_fields() {
        for (i, d) in generate(Profile::Narrow, rng(7), 200).iter().enumerate() {
            assert!(matches!(
                d.data_type,
                DataType::Int16 | DataType::Int32 | DataType::Float32
            ));
            assert_eq!(d.slaver_id, 1);
            assert_eq!(d.function, FunctionCode::ReadHoldingRegisters);
            assert_eq!(d.weight, if i % 2 == 0 { 1.0 } else { 0.1 });
            assert!(d.is_consistent(), "{d:?}");
        }
    }

    #[test]
    fn full_profile_covers_the_whole_data_type_enum() {
        let types = Profile::Full.data_types();
        assert_eq!(types.len(), DataType::iter().count());
        for data_type in DataType::iter() {
            assert!(types.contains(&data_type), "{data_type} missing from the full profile");
        }
    }

    #[test]
    fn iteration_ends_when_the_address_space_exhausts() {
        let mut produced = 0usize;
        let mut last_address = 0u16;
        for d in Generator::new(Profile::Full, rng(8)) {
            produced += 1;
            last_address = d.read_address;
        }
        assert_eq!(produced, MAX_DESCRIPTORS);
        assert_eq!(last_address, u16::MAX);
    }
}
