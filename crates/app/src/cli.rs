use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use engine::{Money, PaymentMethod, PaymentType, Platform, ShipmentStatus};

#[derive(Parser, Debug)]
#[command(name = "reseller")]
#[command(about = "Bookkeeping for reseller orders, shipments and payments")]
pub struct Cli {
    /// Optional settings file path (TOML).
    #[arg(long)]
    pub config: Option<String>,

    /// Database connection string, overrides the settings file.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Client(ClientCommand),
    #[command(subcommand)]
    Shipment(ShipmentCommand),
    #[command(subcommand)]
    Order(OrderCommand),
    #[command(subcommand)]
    Payment(PaymentCommand),
    #[command(subcommand)]
    Price(PriceCommand),
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub enum ShipmentCommand {
    Add(ShipmentAddArgs),
    List,
    /// Moves a shipment to pending, in_transit, arrived or distributed.
    Status {
        id: i64,
        #[arg(value_parser = parse_shipment_status)]
        status: ShipmentStatus,
    },
    Costs {
        id: i64,
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        base: Money,
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        transport: Money,
        #[arg(long, value_parser = parse_amount, default_value = "0")]
        other: Money,
    },
    /// Cost of goods, revenue and net profit of a shipment.
    Summary {
        id: i64,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ShipmentAddArgs {
    #[arg(long)]
    pub batch: String,
    #[arg(long)]
    pub from: Option<String>,
    #[arg(long)]
    pub to: Option<String>,
    #[arg(long)]
    pub departure: Option<NaiveDate>,
    #[arg(long)]
    pub arrival: Option<NaiveDate>,
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub base_cost: Money,
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub transport: Money,
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub other: Money,
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Creates an order and records the payment its payment type implies.
    Place(OrderPlaceArgs),
    Show {
        id: i64,
    },
    /// Orders of one shipment or of one client.
    #[command(group(ArgGroup::new("scope").required(true).args(["shipment", "client"])))]
    List {
        #[arg(long)]
        shipment: Option<i64>,
        #[arg(long)]
        client: Option<i64>,
    },
    Remaining {
        id: i64,
    },
    /// Re-derives the payment status from the recorded payments.
    Recalc {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct OrderPlaceArgs {
    #[arg(long)]
    pub client: i64,
    #[arg(long)]
    pub shipment: Option<i64>,
    #[arg(long)]
    pub product: String,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i32,
    /// Unit price in the source currency.
    #[arg(long, value_parser = parse_amount)]
    pub unit_price: Money,
    /// Explicit total selling price; derived from the unit price when absent.
    #[arg(long, value_parser = parse_amount)]
    pub selling_price: Option<Money>,
    #[arg(long, value_parser = parse_payment_type, default_value = "on_delivery")]
    pub payment_type: PaymentType,
    /// Deposit actually collected, defaults to half the selling price.
    #[arg(long, value_parser = parse_amount)]
    pub deposit: Option<Money>,
    #[arg(long, default_value = "other")]
    pub platform: String,
    #[arg(long)]
    pub delivery_option: Option<i64>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl OrderPlaceArgs {
    pub fn platform(&self) -> Platform {
        Platform::from(self.platform.as_str())
    }
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    Add(PaymentArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        payment: PaymentArgs,
    },
    Delete {
        id: i64,
        #[arg(long)]
        order: i64,
    },
    List {
        #[arg(long)]
        order: i64,
    },
}

#[derive(Args, Debug)]
pub struct PaymentArgs {
    #[arg(long)]
    pub order: i64,
    #[arg(long, value_parser = parse_amount)]
    pub amount: Money,
    #[arg(long, value_parser = parse_method)]
    pub method: PaymentMethod,
    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PriceCommand {
    /// Selling price and deposit for a unit price and quantity.
    Quote {
        #[arg(value_parser = parse_amount)]
        unit_price: Money,
        quantity: String,
    },
}

fn parse_amount(raw: &str) -> Result<Money, String> {
    engine::pricing::parse_price(raw).map_err(|err| err.to_string())
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::parse(raw).map_err(|err| err.to_string())
}

fn parse_payment_type(raw: &str) -> Result<PaymentType, String> {
    PaymentType::try_from(raw).map_err(|err| err.to_string())
}

fn parse_shipment_status(raw: &str) -> Result<ShipmentStatus, String> {
    ShipmentStatus::try_from(raw).map_err(|err| err.to_string())
}
