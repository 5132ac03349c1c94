use reel_matcher::models::config::ServerConfig;
use reel_matcher::processing::ZMQMessage;
use reel_matcher::processing::feed::process_feed_message;
use reel_matcher::processing::fusion::MatchContext;
use reel_matcher::processing::visual::load_classifier;
use reel_matcher::repository::ProfileReader;
use reel_matcher::repository::profile::JsonProfileRepository;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let profile = match JsonProfileRepository::new(&server_config.reference_path).load_profile() {
        Ok(profile) => profile,
        Err(e) => {
            log::error!(
                "Failed to load reference data {}: {e}",
                server_config.reference_path.display()
            );
            std::process::exit(1);
        }
    };
    log::info!("Loaded reference profile with {} fields", profile.len());

    let classifier = load_classifier(server_config.model_path.as_deref());
    let context = MatchContext::new(profile, classifier, server_config.match_settings());

    let zmq_context = zmq::Context::new();
    let responder = match zmq_context.socket(zmq::PULL) {
        Ok(socket) => socket,
        Err(e) => {
            log::error!("Cannot create zmq socket: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = responder.bind(&server_config.zmq_address) {
        log::error!("Cannot bind to {}: {e}", server_config.zmq_address);
        std::process::exit(1);
    }
    log::info!("Listening on {}", server_config.zmq_address);

    loop {
        let msg = match responder.recv_bytes(0) {
            Ok(msg) => msg,
            Err(e) => {
                log::error!("Failed to receive message: {e}");
                continue;
            }
        };
        match serde_json::from_slice::<ZMQMessage>(&msg) {
            Ok(parsed) => {
                process_feed_message(
                    parsed,
                    &context,
                    server_config.concurrency,
                    server_config.request_timeout(),
                )
                .await
            }
            Err(e) => log::error!("Failed to parse JSON: {e}"),
        }
    }
}
