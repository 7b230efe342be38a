pub mod generate {
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;
    use tracing::info;

    use crate::descriptor::RegisterDescriptor;
    use crate::generator::{Generator, MAX_DESCRIPTORS, Profile};
    use crate::output;

    /// Generate a register-map fixture of internally consistent descriptors.
    #[derive(clap::Parser)]
    pub struct Args {
        /// Number of register descriptors to produce.
        count: usize,
        #[arg(long, value_enum, default_value_t = Profile::Full)]
        profile: Profile,
        /// Seed the random source for a reproducible fixture.
        #[arg(long)]
        seed: Option<u64>,
        #[command(flatten)]
        output: output::Args,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error(
            "cannot fit {0} descriptors into the 16-bit address space (at most {max})",
            max = MAX_DESCRIPTORS
        )]
        TooManyDescriptors(usize),
        #[error("could not write out the fixture")]
        Output(#[from] output::Error),
    }

    pub fn run(args: Args) -> Result<(), Error> {
        if args.count > MAX_DESCRIPTORS {
            return Err(Error::TooManyDescriptors(args.count));
        }
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut output = args.output.to_output()?;
        output.headers(&RegisterDescriptor::COLUMNS)?;
        for descriptor in Generator::new(args.profile, rng).take(args.count) {
            output.record(|| descriptor.row(), || &descriptor)?;
        }
        let records = output.records();
        output.commit()?;
        info!(records, profile = ?args.profile, "fixture generated");
        Ok(())
    }
}

pub mod data_types {
    use strum::IntoEnumIterator as _;

    use crate::descriptor::{DataOrder, DataType, Quantity};
    use crate::output;

    /// List the supported data types with their word counts and permitted
    /// byte orders.
    #[derive(clap::Parser)]
    pub struct Args {
        /// Only list types whose name contains this substring.
        filter: Option<String>,
        #[command(flatten)]
        output: output::Args,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not write out the data type table")]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    struct TypeRow {
        data_type: DataType,
        read_quantity: String,
        data_orders: &'static [DataOrder],
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut output = args.output.to_output()?;
        output.headers(&["DataType", "ReadQuantity", "DataOrders"])?;
        for data_type in DataType::iter() {
            if let Some(filter) = &args.filter {
                if !data_type.to_string().contains(&filter.to_lowercase()) {
                    continue;
                }
            }
            let spec = data_type.spec();
            let quantity = match spec.quantity {
                Quantity::Words(words) => words.to_string(),
                Quantity::UpTo(max) => format!("1..={max}"),
            };
            let orders = spec
                .orders
                .iter()
                .map(|order| order.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            output.record(
                || vec![data_type.to_string(), quantity.clone(), orders.clone()],
                || TypeRow {
                    data_type,
                    read_quantity: quantity.clone(),
                    data_orders: spec.orders,
                },
            )?;
        }
        output.commit()?;
        Ok(())
    }
}
