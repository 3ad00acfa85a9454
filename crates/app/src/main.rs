use clap::Parser;
use engine::{Engine, NewShipment, Order, OrderDraft, PaymentInput, pricing};
use migration::{Migrator, MigratorTrait};

use cli::{
    Cli, ClientCommand, Command, OrderCommand, OrderPlaceArgs, PaymentArgs, PaymentCommand,
    PriceCommand, ShipmentAddArgs, ShipmentCommand,
};
use error::Result;

mod cli;
mod error;
mod settings;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "reseller={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let db = connect(&url).await?;

    let engine = Engine::builder()
        .database(db)
        .settings(settings.pricing)
        .build()
        .await?;

    run(&engine, cli.command).await?;
    Ok(())
}

async fn connect(url: &str) -> Result<sea_orm::DatabaseConnection> {
    tracing::debug!(url, "connecting to database");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

async fn run(engine: &Engine, command: Command) -> Result<()> {
    match command {
        Command::Client(command) => client(engine, command).await,
        Command::Shipment(command) => shipment(engine, command).await,
        Command::Order(command) => order(engine, command).await,
        Command::Payment(command) => payment(engine, command).await,
        Command::Price(command) => price(engine, command),
    }
}

async fn client(engine: &Engine, command: ClientCommand) -> Result<()> {
    match command {
        ClientCommand::Add { name, phone, notes } => {
            let id = engine
                .new_client(&name, phone.as_deref(), notes.as_deref())
                .await?;
            println!("{id}");
        }
        ClientCommand::List => {
            for client in engine.clients().await? {
                println!(
                    "{}\t{}\t{}",
                    client.id,
                    client.name,
                    client.phone.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

async fn shipment(engine: &Engine, command: ShipmentCommand) -> Result<()> {
    match command {
        ShipmentCommand::Add(args) => {
            let id = engine.new_shipment(new_shipment(args)).await?;
            println!("{id}");
        }
        ShipmentCommand::List => {
            for shipment in engine.shipments().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    shipment.id,
                    shipment.batch_name,
                    shipment.status,
                    pricing::format_price(
                        shipment
                            .transportation_cost
                            .try_add(shipment.other_costs)?
                    )
                );
            }
        }
        ShipmentCommand::Status { id, status } => {
            engine.set_shipment_status(id, status).await?;
        }
        ShipmentCommand::Costs {
            id,
            base,
            transport,
            other,
        } => {
            engine
                .update_shipment_costs(id, base, transport, other)
                .await?;
        }
        ShipmentCommand::Summary { id, json } => {
            let summary = engine.financial_summary(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("orders\t{}", summary.total_orders);
                println!("cost of goods\t{}", pricing::format_price(summary.total_cost_of_goods));
                println!("transportation\t{}", pricing::format_price(summary.transportation_cost));
                println!("other costs\t{}", pricing::format_price(summary.other_costs));
                println!("expenses\t{}", pricing::format_price(summary.total_expenses));
                println!("revenue\t{}", pricing::format_price(summary.total_revenue));
                println!("net profit\t{}", pricing::format_price(summary.net_profit));
            }
        }
    }
    Ok(())
}

fn new_shipment(args: ShipmentAddArgs) -> NewShipment {
    NewShipment {
        batch_name: args.batch,
        departure_country: args.from,
        arrival_country: args.to,
        departure_date: args.departure,
        arrival_date: args.arrival,
        base_cost: args.base_cost,
        transportation_cost: args.transport,
        other_costs: args.other,
    }
}

async fn order(engine: &Engine, command: OrderCommand) -> Result<()> {
    match command {
        OrderCommand::Place(args) => {
            let deposit = args.deposit;
            let placement = engine.place_order(&order_draft(args), deposit).await?;
            println!(
                "order {} selling {} status {}",
                placement.order_id,
                pricing::format_price(placement.selling_price),
                placement.payment_status
            );
        }
        OrderCommand::Show { id } => {
            let order = engine.order(id).await?;
            let remaining = engine.remaining_amount(id).await?;
            print_order(&order);
            println!("remaining\t{}", pricing::format_price(remaining));
        }
        OrderCommand::List { shipment, client } => {
            let orders = match shipment {
                Some(shipment_id) => engine.orders_for_shipment(shipment_id).await?,
                None => {
                    engine
                        .orders_for_client(client.unwrap_or_default())
                        .await?
                }
            };
            for order in orders {
                println!(
                    "{}\t{}\tx{}\t{}\t{}",
                    order.id,
                    order.product,
                    order.quantity,
                    pricing::format_price(order.selling_price),
                    order.payment_status
                );
            }
        }
        OrderCommand::Remaining { id } => {
            let remaining = engine.remaining_amount(id).await?;
            println!("{}", pricing::format_price(remaining));
        }
        OrderCommand::Recalc { id } => {
            let status = engine.recalculate_payment_status(id).await?;
            println!("{status}");
        }
        OrderCommand::Delete { id } => {
            engine.delete_order(id).await?;
        }
    }
    Ok(())
}

fn order_draft(args: OrderPlaceArgs) -> OrderDraft {
    let platform = args.platform();
    OrderDraft {
        client_id: args.client,
        shipment_id: args.shipment,
        delivery_option_id: args.delivery_option,
        product: args.product,
        size: args.size,
        quantity: args.quantity,
        original_price: args.unit_price,
        selling_price: args.selling_price,
        payment_type: args.payment_type,
        platform,
        notes: args.notes,
    }
}

fn print_order(order: &Order) {
    println!("id\t{}", order.id);
    println!("client\t{}", order.client_id);
    if let Some(shipment_id) = order.shipment_id {
        println!("shipment\t{shipment_id}");
    }
    println!("product\t{}", order.product);
    if let Some(size) = &order.size {
        println!("size\t{size}");
    }
    println!("quantity\t{}", order.quantity);
    println!("unit price\t{}", pricing::format_price(order.original_price));
    println!("selling price\t{}", pricing::format_price(order.selling_price));
    println!("payment type\t{}", order.payment_type.as_str());
    println!("payment status\t{}", order.payment_status);
    println!("platform\t{}", order.platform.as_str());
}

async fn payment(engine: &Engine, command: PaymentCommand) -> Result<()> {
    match command {
        PaymentCommand::Add(args) => {
            let id = engine.add_payment(&payment_input(args)).await?;
            println!("{id}");
        }
        PaymentCommand::Edit { id, payment } => {
            engine.update_payment(id, &payment_input(payment)).await?;
        }
        PaymentCommand::Delete { id, order } => {
            engine.delete_payment(id, order).await?;
        }
        PaymentCommand::List { order } => {
            for payment in engine.payments_for_order(order).await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    payment.id,
                    payment.created_at.format("%Y-%m-%d %H:%M"),
                    pricing::format_price(payment.amount),
                    payment.method,
                    payment.comment.as_deref().unwrap_or("")
                );
            }
            let paid = engine.total_paid_for_order(order).await?;
            println!("total\t{}", pricing::format_price(paid));
        }
    }
    Ok(())
}

fn payment_input(args: PaymentArgs) -> PaymentInput {
    let input = PaymentInput::new(args.order, args.amount, args.method);
    match args.comment {
        Some(comment) => input.with_comment(comment),
        None => input,
    }
}

fn price(engine: &Engine, command: PriceCommand) -> Result<()> {
    match command {
        PriceCommand::Quote {
            unit_price,
            quantity,
        } => {
            let settings = engine.pricing_settings();
            let quantity = pricing::parse_quantity(&quantity)?;
            let unit = pricing::selling_price(unit_price, &settings)?;
            let total = pricing::total_selling_price(unit_price, quantity, &settings)?;
            let deposit = pricing::deposit(total)?;
            println!("unit selling price\t{}", pricing::format_price(unit));
            println!("total selling price\t{}", pricing::format_price(total));
            println!("deposit\t{}", pricing::format_price(deposit));
            println!(
                "remaining after deposit\t{}",
                pricing::format_price(pricing::remaining(total, deposit))
            );
        }
    }
    Ok(())
}
