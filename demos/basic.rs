//! Basic valnote Example
//!
//! Decodes a handful of responses offline, then talks to a live server.
//!
//! Run with: cargo run --example basic
//! Against a server: cargo run --example basic -- 127.0.0.1:8001 [password]

use valnote_core::Value;
use valnote_protocol::decode;
use valnote_transport::{Client, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("valnote Basic Example\n");

    // Example 1: Decoding responses (no server needed)
    println!("=== Decoding ===\n");
    decode_example()?;

    // Example 2: Client session
    println!("\n=== Client Mode ===");
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(addr) => client_example(&addr, args.next()).await?,
        None => println!("(Pass a server address to run this part, e.g. 127.0.0.1:8001)"),
    }

    Ok(())
}

fn decode_example() -> Result<(), Box<dyn std::error::Error>> {
    for response in [
        "null",
        "'9'",
        "-0.01",
        r#""knuckle\"ball""#,
        "[i,prices,std::ages]",
        "{1,1,2}",
        r#"(("knuckle",false),("ball",true))"#,
        "(1,2)",
    ] {
        let value = decode(response)?;
        println!("{:<40} -> {:?}", response, value);
    }

    // Server-reported errors are errors, not values
    match decode("RuntimeError: wrong number of arguments.") {
        Ok(value) => println!("unexpected value: {}", value),
        Err(e) => println!("\nServer error: {}", e),
    }

    // Values echo back in notation
    let ages = decode(r#"(("alice",30),("bob",25))"#)?;
    println!("Echo: {}", ages);
    println!("Bob: {:?}", ages.get(&Value::from("bob")));
    println!("JSON: {}", ages.to_json());

    Ok(())
}

async fn client_example(addr: &str, password: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (host, port) = addr.rsplit_once(':').ok_or("expected host:port")?;
    let mut config = ClientConfig::new(host, port.parse()?).with_timeout_secs(5);
    if let Some(password) = password {
        config = config.with_password(password);
    }

    let mut client = Client::connect(&config).await?;

    for command in [
        "Integer create: i withValue: 42;",
        "i get;",
        "Vector<Integer> create: prices;",
        "prices get;",
        "Dictionary<String, Integer> create: std::ages;",
        "std::ages get;",
        "Context listVariables;",
        "Context listNamespaces;",
    ] {
        println!("> {}", command);
        match client.execute(command).await {
            Ok(value) => println!("< {}", value),
            Err(e) => println!("! {}", e),
        }
    }

    Ok(())
}
