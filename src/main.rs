use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};

use folio::bus::{ChatEvent, EventBus};
use folio::chat::{format_timestamp, ChatMessage};
use folio::config::Settings;
use folio::contact::{ContactForm, ContactOutcome, SimulatedSink};
use folio::content::Portfolio;
use folio::entity::{Participant, Sender};
use folio::responder::Responder;
use folio::session::ChatSession;
use folio::timeline::format_duration;

const HELP: &str = "Type a message to chat. Commands: /open /close /toggle /history /timeline /contact /quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        info!("No .env file found or failed to load: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env()?;
    let portfolio = Portfolio::load(&settings.content_dir).await?;
    let profile = Arc::new(portfolio.profile.clone());

    let owner = Participant::new(
        settings
            .owner_name
            .clone()
            .unwrap_or_else(|| profile.name.clone()),
        profile.avatar.clone(),
    );

    let bus = Arc::new(EventBus::new());
    let session = ChatSession::new(Arc::new(Responder::new(profile.clone())), owner.clone())
        .with_reply_delay(settings.reply_delay)
        .with_bus(bus.clone())
        .with_history(vec![ChatMessage::owner(format!(
            "Hi! I'm {}. Ask me anything about my work.",
            profile.first_name()
        ))]);

    let renderer = tokio::spawn(render_replies(bus.clone(), owner.clone()));

    println!("{} | {} | {}", profile.name, profile.title, profile.location);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        res = repl(&session, &portfolio, &mut lines) => {
            if let Err(e) = res {
                error!("Input loop stopped with error: {}", e);
            }
        }
    }

    session.dispose();
    renderer.abort();
    Ok(())
}

async fn repl(
    session: &ChatSession,
    portfolio: &Portfolio,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/open" => {
                session.open();
                print_history(session);
            }
            "/close" => session.close(),
            "/toggle" => {
                session.toggle();
                if session.is_open() {
                    print_history(session);
                }
            }
            "/history" => print_history(session),
            "/timeline" => {
                for entry in portfolio.experience_timeline() {
                    println!(
                        "{} at {} ({})",
                        entry.role,
                        entry.company,
                        format_duration(entry.start_date, entry.end_date)
                    );
                }
            }
            "/contact" => contact(lines).await?,
            command if command.starts_with('/') => println!("{HELP}"),
            text => {
                if !session.is_open() {
                    session.open();
                }
                // The renderer prints the reply when it lands
                let _ = session.send_user_message(text);
            }
        }
    }
    Ok(())
}

async fn contact(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<()> {
    let mut form = ContactForm::default();
    let sink = SimulatedSink::new();

    loop {
        form.name = prompt(lines, "Name", &form.name).await?;
        form.email = prompt(lines, "Email", &form.email).await?;
        form.message = prompt(lines, "Message", &form.message).await?;

        match form.submit(&sink) {
            ContactOutcome::Sent => {
                println!("Thanks! Your message has been sent.");
                return Ok(());
            }
            ContactOutcome::Invalid(errors) => {
                for error in [errors.name, errors.email, errors.message].into_iter().flatten() {
                    println!("  ! {error}");
                }
            }
            ContactOutcome::Failed { reason } => println!("  ! {reason}"),
        }
    }
}

/// Read one field; an empty line keeps the previous value.
async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
    current: &str,
) -> anyhow::Result<String> {
    if current.is_empty() {
        println!("{label}:");
    } else {
        println!("{label} [{current}]:");
    }
    let line = lines
        .next_line()
        .await?
        .ok_or_else(|| anyhow::anyhow!("input closed while filling in the contact form"))?;
    Ok(if line.trim().is_empty() {
        current.to_string()
    } else {
        line
    })
}

fn print_history(session: &ChatSession) {
    let owner = session.owner();
    for message in session.messages() {
        print_message(owner, &message);
    }
}

fn print_message(owner: &Participant, message: &ChatMessage) {
    let who = match message.sender {
        Sender::User => "You".to_string(),
        Sender::Owner => owner.name.clone(),
    };
    println!("[{}] {}: {}", format_timestamp(&message.timestamp), who, message.content);
}

async fn render_replies(bus: Arc<EventBus>, owner: Participant) {
    let mut rx = bus.subscribe();
    let mut is_open = false;
    while let Ok(event) = rx.recv().await {
        match event {
            ChatEvent::Toggled { is_open: open } => is_open = open,
            ChatEvent::MessageAppended(message) if message.sender == Sender::Owner => {
                if is_open {
                    print_message(&owner, &message);
                } else {
                    println!("({} replied, /open to read)", owner.name);
                }
            }
            ChatEvent::Disposed => break,
            _ => {}
        }
    }
}
