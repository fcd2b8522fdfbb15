use typed_mediator::{DefaultMediator, HandlerResult, Mediator, Request, RequestHandler};

struct Ping;
impl Request for Ping {
    type Response = &'static str;
}

struct HelloRequest(Option<&'static str>);
impl Request for HelloRequest {
    type Response = String;
}

struct HelloRequestHandler;
impl RequestHandler for HelloRequestHandler {
    type Request = HelloRequest;

    fn handle(&self, req: HelloRequest) -> HandlerResult<String> {
        match req.0 {
            Some(name) => Ok(format!("Hello, {}!", name)),
            None => Ok("Hello World!".to_string()),
        }
    }
}

struct Unknown;
impl Request for Unknown {
    type Response = ();
}

fn main() {
    env_logger::init();

    let mediator = DefaultMediator::builder()
        .add_handler_fn(|_: Ping| Ok("pong"))
        .add_handler(HelloRequestHandler)
        .build()
        .expect("handlers are misconfigured");

    println!("{}", mediator.send(Ping).unwrap());
    println!("{}", mediator.send(HelloRequest(Some("Rust"))).unwrap());
    println!("{}", mediator.send(HelloRequest(None)).unwrap());

    if let Err(err) = mediator.send(Unknown) {
        log::warn!("{}", err);
    }
}
