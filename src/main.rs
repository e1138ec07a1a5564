use clap::Parser;
use lesson_shop::utils::{logger, validation::Validate};
use lesson_shop::{
    CliConfig, ConfigProvider, HttpCatalog, SortDirection, SortKey, Storefront, TomlConfig,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting lesson-shop CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // TOML 配置檔優先於 CLI 預設值
    let mut base_url = config.base_url.clone();
    let mut sort_key = config.sort_key;
    let mut direction = if config.descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    if let Some(path) = &config.config {
        let toml_config = TomlConfig::from_file(path)?;
        toml_config.validate()?;
        tracing::info!("📄 Loaded configuration from {}", path);
        base_url = toml_config.base_url().to_string();
        sort_key = toml_config.sort_key();
        direction = toml_config.direction();
    }

    let catalog = HttpCatalog::new(&base_url);
    let mut shop = Storefront::new(catalog);
    shop.sort_key = sort_key;
    shop.direction = direction;

    println!("🛍️  lesson-shop connected to catalog service at {}", base_url);

    shop.fetch_lessons().await;
    if !config.query.is_empty() {
        shop.set_search_query(config.query.clone()).await;
    }
    report(&mut shop);
    print_lessons(&shop);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.as_str(), ""),
        };

        match command {
            "" => {}
            "list" => print_lessons(&shop),
            "refresh" => {
                shop.fetch_lessons().await;
                print_lessons(&shop);
            }
            "search" => {
                shop.set_search_query(rest).await;
                print_lessons(&shop);
            }
            "sort" => match parse_sort_key(rest) {
                Some(key) => {
                    shop.sort_key = key;
                    print_lessons(&shop);
                }
                None => println!("❌ Usage: sort <subject|location|price|spaces>"),
            },
            "order" => {
                shop.toggle_order();
                print_lessons(&shop);
            }
            "add" => match rest.parse::<usize>() {
                Ok(position) if position >= 1 => {
                    let view = shop.filtered_lessons();
                    match view.get(position - 1) {
                        Some(lesson) if lesson.spaces == 0 => {
                            println!("❌ No spaces left for {}", lesson.subject);
                        }
                        Some(lesson) => {
                            let id = lesson.id.clone();
                            let subject = lesson.subject.clone();
                            shop.add_to_cart(&id).await;
                            println!("🛒 Added {} to cart", subject);
                        }
                        None => println!("❌ No lesson at position {}", position),
                    }
                }
                _ => println!("❌ Usage: add <position>"),
            },
            "remove" => match rest.parse::<usize>() {
                Ok(position) if position >= 1 && position <= shop.cart.len() => {
                    let subject = shop.cart[position - 1].lesson.subject.clone();
                    shop.remove_from_cart(position - 1).await;
                    println!("🗑️  Removed {} from cart", subject);
                }
                _ => println!("❌ Usage: remove <cart position>"),
            },
            "cart" => {
                shop.toggle_cart();
                print_cart(&shop);
            }
            "name" => {
                shop.name = rest.to_string();
                println!("👤 Name set to '{}'", shop.name);
            }
            "phone" => {
                shop.phone = rest.to_string();
                println!("📞 Phone set to '{}'", shop.phone);
            }
            "checkout" => {
                if shop.cart.is_empty() {
                    println!("❌ Cart is empty");
                } else if !shop.valid_form() {
                    println!("❌ Name must be letters/spaces and phone exactly 10 digits");
                } else {
                    shop.checkout().await;
                    if shop.order_confirmed() {
                        println!("✅ Order confirmed!");
                    }
                }
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            unknown => println!("❌ Unknown command '{}' (try 'help')", unknown),
        }

        report(&mut shop);
        prompt()?;
    }

    println!("👋 Bye");
    Ok(())
}

fn parse_sort_key(value: &str) -> Option<SortKey> {
    match value {
        "subject" => Some(SortKey::Subject),
        "location" => Some(SortKey::Location),
        "price" => Some(SortKey::Price),
        "spaces" => Some(SortKey::Spaces),
        _ => None,
    }
}

/// 把最近一次失敗通知印給使用者 (alert 的 CLI 版本)
fn report(shop: &mut Storefront<HttpCatalog>) {
    if let Some(notice) = shop.take_notice() {
        eprintln!("❌ {}", notice);
    }
}

fn print_lessons(shop: &Storefront<HttpCatalog>) {
    let lessons = shop.filtered_lessons();
    if lessons.is_empty() {
        println!("📚 No lessons match");
        return;
    }
    println!(
        "📚 {} lessons (sorted by {:?}, {:?}):",
        lessons.len(),
        shop.sort_key,
        shop.direction
    );
    for (index, lesson) in lessons.iter().enumerate() {
        println!(
            "  {}. {} @ {} : £{} ({} spaces)",
            index + 1,
            lesson.subject,
            lesson.location,
            lesson.price,
            lesson.spaces
        );
    }
}

fn print_cart(shop: &Storefront<HttpCatalog>) {
    if shop.cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }
    println!("🛒 Cart:");
    for (index, line) in shop.cart.iter().enumerate() {
        println!(
            "  {}. {} x{} : £{}",
            index + 1,
            line.lesson.subject,
            line.quantity,
            line.subtotal()
        );
    }
    println!("💰 Total: £{}", shop.cart_total());
}

fn print_help() {
    println!("Commands:");
    println!("  list                 show lessons (current sort/filter)");
    println!("  search <text>        server-side search; empty text reloads all");
    println!("  sort <key>           subject | location | price | spaces");
    println!("  order                toggle ascending/descending");
    println!("  add <position>       add the listed lesson to the cart");
    println!("  remove <position>    remove a cart line (restores spaces)");
    println!("  cart                 show the cart");
    println!("  name <text>          set customer name");
    println!("  phone <digits>       set customer phone");
    println!("  checkout             submit the order");
    println!("  refresh              reload lessons from the service");
    println!("  quit                 leave");
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
