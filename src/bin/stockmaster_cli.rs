use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use stockmaster_client::{
    api::ApiClient,
    config,
    events::{self, EventSender},
    models::{
        AdjustmentDirection, DeliveryLineItem, DeliveryOrder, DeliveryStatus, LocationInput,
        ProductInput, WarehouseInput,
    },
    notifications::NotificationBus,
    services::{DeliveryService, LocationDirectory, StockService},
    store::{ProductCollection, ResourceStore, WarehouseCollection},
};
use rust_decimal_macros::dec;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Products(command) => handle_products_command(&context, command, cli.json).await?,
        Commands::Stocks(command) => handle_stocks_command(&context, command, cli.json).await?,
        Commands::Warehouses(command) => {
            handle_warehouses_command(&context, command, cli.json).await?
        }
        Commands::Transfers(command) => {
            handle_transfers_command(&context, command, cli.json).await?
        }
        Commands::Deliveries(command) => {
            handle_deliveries_command(&context, command, cli.json).await?
        }
        Commands::Locations(command) => {
            handle_locations_command(&context, command, cli.json).await?
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "stockmaster",
    about = "StockMaster CLI for inventory, warehouses and deliveries",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Products(ProductsCommands),
    #[command(subcommand)]
    Stocks(StocksCommands),
    #[command(subcommand)]
    Warehouses(WarehousesCommands),
    #[command(subcommand)]
    Transfers(TransfersCommands),
    #[command(subcommand)]
    Deliveries(DeliveriesCommands),
    #[command(subcommand)]
    Locations(LocationsCommands),
}

#[derive(Subcommand)]
enum ProductsCommands {
    /// Fetch and display the product catalog
    List,
    Create(ProductArgs),
    Update(ProductUpdateArgs),
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    sku: String,
    #[arg(long, default_value = "General")]
    category: String,
    #[arg(long, default_value = "pcs")]
    unit: String,
    #[arg(long)]
    cost: Decimal,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    reorder_level: Option<Decimal>,
}

#[derive(Args)]
struct ProductUpdateArgs {
    #[arg(help = "Product identifier")]
    id: String,
    #[command(flatten)]
    fields: ProductArgs,
}

#[derive(Subcommand)]
enum StocksCommands {
    /// Fetch and display all stock rows
    List,
    /// Per-product totals across warehouses
    Summary,
    Adjust(AdjustArgs),
    /// Movements recorded this session
    Ledger,
}

#[derive(Args)]
struct AdjustArgs {
    #[arg(long)]
    product_id: String,
    #[arg(long)]
    warehouse_id: i32,
    #[arg(long)]
    quantity: Decimal,
    #[arg(long, value_parser = parse_direction, help = "add or remove")]
    operation: AdjustmentDirection,
}

fn parse_direction(raw: &str) -> Result<AdjustmentDirection, String> {
    raw.parse()
        .map_err(|_| format!("expected 'add' or 'remove', got '{}'", raw))
}

#[derive(Subcommand)]
enum WarehousesCommands {
    List,
    Create(WarehouseArgs),
    Update(WarehouseUpdateArgs),
    Delete(WarehouseDeleteArgs),
}

#[derive(Args)]
struct WarehouseArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    code: String,
    #[arg(long, default_value = "")]
    address: String,
}

#[derive(Args)]
struct WarehouseUpdateArgs {
    #[arg(help = "Warehouse identifier")]
    id: i32,
    #[command(flatten)]
    fields: WarehouseArgs,
}

#[derive(Args)]
struct WarehouseDeleteArgs {
    #[arg(help = "Warehouse identifier")]
    id: i32,
}

#[derive(Subcommand)]
enum TransfersCommands {
    List,
}

#[derive(Subcommand)]
enum DeliveriesCommands {
    /// List the demo delivery orders
    List,
    Show(DeliveryIdArgs),
    Search(DeliverySearchArgs),
    /// Move an order one step along Draft -> Waiting -> Ready -> Done
    Advance(DeliveryIdArgs),
    /// Confirm a Ready order as Done
    Validate(DeliveryIdArgs),
    Cancel(DeliveryIdArgs),
}

#[derive(Args)]
struct DeliveryIdArgs {
    #[arg(help = "Delivery order identifier")]
    id: i64,
}

#[derive(Args)]
struct DeliverySearchArgs {
    #[arg(help = "Match against reference or contact")]
    query: String,
}

#[derive(Subcommand)]
enum LocationsCommands {
    List,
    Add(LocationAddArgs),
}

#[derive(Args)]
struct LocationAddArgs {
    #[arg(long)]
    warehouse_id: i32,
    #[arg(long)]
    name: String,
    #[arg(long)]
    short_code: String,
}

struct CliContext {
    client: Arc<ApiClient>,
    notifier: NotificationBus,
    event_sender: EventSender,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let client =
            Arc::new(ApiClient::from_config(&config).context("failed to build API client")?);

        let (event_sender, mut event_rx) = events::channel(32);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                debug!(target: "stockmaster", event = ?event, "received async event");
            }
        });

        Ok(Self {
            client,
            notifier: NotificationBus::new(),
            event_sender,
        })
    }

    fn product_store(&self) -> ResourceStore<ProductCollection> {
        ResourceStore::new(
            ProductCollection::new(self.client.clone()),
            self.notifier.clone(),
        )
    }

    fn warehouse_store(&self) -> ResourceStore<WarehouseCollection> {
        ResourceStore::new(
            WarehouseCollection::new(self.client.clone()),
            self.notifier.clone(),
        )
    }

    fn stock_service(&self) -> StockService {
        StockService::new(
            self.client.clone(),
            self.notifier.clone(),
            self.event_sender.clone(),
        )
    }

    fn delivery_service(&self) -> DeliveryService {
        let service = DeliveryService::new(self.notifier.clone(), self.event_sender.clone());
        service.replace_all(demo_deliveries());
        service
    }

    fn location_directory(&self) -> LocationDirectory {
        LocationDirectory::new(self.notifier.clone(), self.event_sender.clone())
    }
}

async fn handle_products_command(
    context: &CliContext,
    command: ProductsCommands,
    json: bool,
) -> Result<()> {
    let store = context.product_store();
    match command {
        ProductsCommands::List => {
            store.load().await.context("failed to load products")?;
            let products = store.snapshot();
            if json {
                print_json(&products)?;
            } else {
                for product in &products {
                    println!(
                        "{}  {}  [{}]  {} {}",
                        product.id, product.name, product.sku, product.cost, product.unit_of_measure
                    );
                }
                println!("{} product(s)", products.len());
            }
        }
        ProductsCommands::Create(args) => {
            let created = store
                .create(&product_input(args))
                .await
                .context("failed to create product")?;
            if json {
                print_json(&created)?;
            } else {
                println!("Created product {} ({})", created.name, created.id);
            }
        }
        ProductsCommands::Update(args) => {
            let updated = store
                .update(&args.id, &product_input(args.fields))
                .await
                .context("failed to update product")?;
            if json {
                print_json(&updated)?;
            } else {
                println!("Updated product {} ({})", updated.name, updated.id);
            }
        }
    }
    Ok(())
}

fn product_input(args: ProductArgs) -> ProductInput {
    ProductInput {
        name: args.name,
        sku: args.sku,
        category: args.category,
        unit_of_measure: args.unit,
        cost: args.cost,
        description: args.description,
        reorder_level: args.reorder_level,
    }
}

async fn handle_stocks_command(
    context: &CliContext,
    command: StocksCommands,
    json: bool,
) -> Result<()> {
    let service = context.stock_service();
    match command {
        StocksCommands::List => {
            service.load().await.context("failed to load stocks")?;
            let records = service.snapshot();
            if json {
                print_json(&records)?;
            } else {
                for record in &records {
                    println!(
                        "{} @ {} ({}): on hand {}, reserved {}, free {}",
                        record.product_id,
                        record.warehouse_name,
                        record.warehouse_id,
                        record.quantity,
                        record.reserved,
                        record.free_to_use()
                    );
                }
                println!("{} row(s)", records.len());
            }
        }
        StocksCommands::Summary => {
            service.load().await.context("failed to load stocks")?;
            for summary in service.summarize() {
                println!(
                    "{}: on hand {} across {} warehouse(s), reserved {}, free {}",
                    summary.product_id,
                    summary.total_on_hand,
                    summary.warehouse_count,
                    summary.total_reserved,
                    summary.total_free
                );
            }
        }
        StocksCommands::Adjust(args) => {
            service.load().await.context("failed to load stocks")?;
            let applied = service
                .adjust(
                    &args.product_id,
                    args.warehouse_id,
                    args.quantity,
                    args.operation,
                )
                .await
                .context("failed to adjust stock")?;
            if applied < args.quantity {
                println!(
                    "Applied {} of requested {} (clamped to on-hand stock)",
                    applied, args.quantity
                );
            } else {
                println!("Applied {} {}", args.operation, applied);
            }
        }
        StocksCommands::Ledger => {
            let entries = service.ledger();
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No movements recorded this session");
            } else {
                for entry in &entries {
                    println!(
                        "{}  {}  {}  {}",
                        entry.recorded_at, entry.reference, entry.quantity_change, entry.product_id
                    );
                }
            }
        }
    }
    Ok(())
}

async fn handle_warehouses_command(
    context: &CliContext,
    command: WarehousesCommands,
    json: bool,
) -> Result<()> {
    let store = context.warehouse_store();
    match command {
        WarehousesCommands::List => {
            store.load().await.context("failed to load warehouses")?;
            let warehouses = store.snapshot();
            if json {
                print_json(&warehouses)?;
            } else {
                for warehouse in &warehouses {
                    println!(
                        "{}  {}  [{}]  {}",
                        warehouse.id, warehouse.name, warehouse.code, warehouse.address
                    );
                }
                println!("{} warehouse(s)", warehouses.len());
            }
        }
        WarehousesCommands::Create(args) => {
            let created = store
                .create(&warehouse_input(args))
                .await
                .context("failed to create warehouse")?;
            if json {
                print_json(&created)?;
            } else {
                println!("Created warehouse {} (id {})", created.name, created.id);
            }
        }
        WarehousesCommands::Update(args) => {
            let updated = store
                .update(&args.id, &warehouse_input(args.fields))
                .await
                .context("failed to update warehouse")?;
            if json {
                print_json(&updated)?;
            } else {
                println!("Updated warehouse {} (id {})", updated.name, updated.id);
            }
        }
        WarehousesCommands::Delete(args) => {
            store
                .delete(&args.id)
                .await
                .context("failed to delete warehouse")?;
            println!("Deleted warehouse {}", args.id);
        }
    }
    Ok(())
}

fn warehouse_input(args: WarehouseArgs) -> WarehouseInput {
    WarehouseInput {
        name: args.name,
        code: args.code,
        address: args.address,
        is_active: true,
    }
}

async fn handle_transfers_command(
    context: &CliContext,
    command: TransfersCommands,
    json: bool,
) -> Result<()> {
    match command {
        TransfersCommands::List => {
            let transfers = context
                .client
                .list_transfers()
                .await
                .context("failed to load internal transfers")?;
            if json {
                print_json(&transfers)?;
            } else {
                for transfer in &transfers {
                    println!(
                        "{}  {} -> {}  [{}]",
                        transfer.id, transfer.from.name, transfer.to.name, transfer.status
                    );
                }
                println!("{} transfer(s)", transfers.len());
            }
        }
    }
    Ok(())
}

async fn handle_deliveries_command(
    context: &CliContext,
    command: DeliveriesCommands,
    json: bool,
) -> Result<()> {
    let service = context.delivery_service();
    match command {
        DeliveriesCommands::List => print_deliveries(&service.list(), json)?,
        DeliveriesCommands::Show(args) => {
            let order = service
                .get(args.id)
                .with_context(|| format!("delivery order {} not found", args.id))?;
            if json {
                print_json(&order)?;
            } else {
                print_delivery(&order);
                for line in &order.lines {
                    let marker = if line.available { " " } else { "!" };
                    println!(
                        "  {} {} x{} ({})",
                        marker, line.product_name, line.quantity, line.product_code
                    );
                }
            }
        }
        DeliveriesCommands::Search(args) => print_deliveries(&service.search(&args.query), json)?,
        DeliveriesCommands::Advance(args) => {
            let order = service
                .advance(args.id)
                .await
                .context("failed to advance delivery")?;
            println!("{} is now {}", order.reference, order.status);
        }
        DeliveriesCommands::Validate(args) => {
            let order = service
                .validate(args.id)
                .await
                .context("failed to validate delivery")?;
            println!("{} is now {}", order.reference, order.status);
        }
        DeliveriesCommands::Cancel(args) => {
            let order = service
                .cancel(args.id)
                .await
                .context("failed to cancel delivery")?;
            println!("{} is now {}", order.reference, order.status);
        }
    }
    Ok(())
}

fn print_deliveries(orders: &[DeliveryOrder], json: bool) -> Result<()> {
    if json {
        print_json(&orders)?;
    } else {
        for order in orders {
            print_delivery(order);
        }
        println!("{} order(s)", orders.len());
    }
    Ok(())
}

fn print_delivery(order: &DeliveryOrder) {
    println!(
        "{}  {}  {}  {} -> {}  [{}]",
        order.id, order.reference, order.contact, order.origin, order.destination, order.status
    );
}

async fn handle_locations_command(
    context: &CliContext,
    command: LocationsCommands,
    json: bool,
) -> Result<()> {
    let directory = context.location_directory();
    match command {
        LocationsCommands::List => {
            let locations = directory.list();
            if json {
                print_json(&locations)?;
            } else if locations.is_empty() {
                println!("No locations recorded this session");
            } else {
                for location in &locations {
                    println!(
                        "{}  {}  [{}]  warehouse {}",
                        location.id, location.name, location.short_code, location.warehouse_id
                    );
                }
            }
        }
        LocationsCommands::Add(args) => {
            let location = directory
                .create(
                    args.warehouse_id,
                    LocationInput {
                        name: args.name,
                        short_code: args.short_code,
                    },
                )
                .await
                .context("failed to create location")?;
            if json {
                print_json(&location)?;
            } else {
                println!("Created location {} ({})", location.name, location.id);
            }
        }
    }
    Ok(())
}

/// Deliveries have no list endpoint yet; the CLI works against the same
/// sample set the delivery screens ship with.
fn demo_deliveries() -> Vec<DeliveryOrder> {
    vec![
        DeliveryOrder {
            id: 1,
            reference: "WH/OUT/0001".into(),
            origin: "WH/Stock".into(),
            destination: "Customers".into(),
            contact: "Azure Interior".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 11, 25).unwrap(),
            status: DeliveryStatus::Ready,
            notes: None,
            lines: vec![
                DeliveryLineItem {
                    product_code: "DESK001".into(),
                    product_name: "Executive Desk".into(),
                    quantity: dec!(2),
                    available: true,
                },
                DeliveryLineItem {
                    product_code: "CHAIR005".into(),
                    product_name: "Office Chair".into(),
                    quantity: dec!(4),
                    available: true,
                },
            ],
        },
        DeliveryOrder {
            id: 2,
            reference: "WH/OUT/0002".into(),
            origin: "WH/Stock".into(),
            destination: "Customers".into(),
            contact: "Balsa Wood Co.".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 11, 26).unwrap(),
            status: DeliveryStatus::Waiting,
            notes: None,
            lines: vec![DeliveryLineItem {
                product_code: "PLY100".into(),
                product_name: "Plywood Sheet".into(),
                quantity: dec!(20),
                available: false,
            }],
        },
        DeliveryOrder {
            id: 3,
            reference: "WH/OUT/0003".into(),
            origin: "WH/Stock".into(),
            destination: "Customers".into(),
            contact: "Creative Designs".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 11, 27).unwrap(),
            status: DeliveryStatus::Done,
            notes: None,
            lines: vec![DeliveryLineItem {
                product_code: "LAMP010".into(),
                product_name: "Desk Lamp".into(),
                quantity: dec!(6),
                available: true,
            }],
        },
        DeliveryOrder {
            id: 4,
            reference: "WH/OUT/0004".into(),
            origin: "WH/Stock".into(),
            destination: "Customers".into(),
            contact: "Delta Corp.".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            status: DeliveryStatus::Draft,
            notes: Some("Awaiting confirmation".into()),
            lines: vec![],
        },
    ]
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
