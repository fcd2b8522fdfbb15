use std::io;
use typed_mediator::{
    DefaultMediator, HandlerResult, Mediator, Notification, NotificationHandler,
};

struct UserCreated {
    id: u64,
    email: String,
}
impl Notification for UserCreated {}

#[derive(Debug, thiserror::Error)]
#[error("refusing to email `{0}`")]
struct InvalidAddress(String);

struct AuditHandler;
impl NotificationHandler for AuditHandler {
    type Notification = UserCreated;

    fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
        println!("{:<10}user {} created", "audit:", event.id);
        Ok(())
    }
}

struct EmailHandler;
impl NotificationHandler for EmailHandler {
    type Notification = UserCreated;

    fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
        if !event.email.contains('@') {
            return Err(Box::new(InvalidAddress(event.email.clone())));
        }
        println!("{:<10}welcome sent to {}", "email:", event.email);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mediator = DefaultMediator::builder()
        .subscribe(AuditHandler)
        .subscribe(EmailHandler)
        .subscribe_fn(|event: &UserCreated| {
            println!("{:<10}user {} ready", "metrics:", event.id);
            Ok(())
        })
        .build()?;

    let mut next_id = 1;
    loop {
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;

        let email = buf.trim();
        if email.is_empty() || email == "exit" {
            break;
        }

        let event = UserCreated {
            id: next_id,
            email: email.to_owned(),
        };
        next_id += 1;

        // A failing handler stops the remaining ones for this event only.
        if let Err(err) = mediator.publish(event) {
            eprintln!("publish failed: {}", err);
        }
    }

    Ok(())
}
