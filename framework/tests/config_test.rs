use courier::config::EnvConfig;
use courier::mail::MailerConfig;
use courier::WorkerConfig;

// Each test uses its own prefix so they can run in parallel.

#[test]
fn worker_config_defaults() {
    let config = WorkerConfig::from_env_with_prefix("COURIER_DEFAULTS_TEST").unwrap();

    assert_eq!(config.queue_url, "nats://localhost:4222");
    assert_eq!(config.queue_name, "email_queue");
    assert_eq!(config.queue_consumer, "courier");
    assert_eq!(config.template_dir, "templates");
    assert!(!config.log_payloads);
}

#[test]
fn worker_config_from_environment() {
    std::env::set_var("WORKER_TEST_QUEUE_URL", "nats://queue:4222");
    std::env::set_var("WORKER_TEST_QUEUE_NAME", "emails");
    std::env::set_var("WORKER_TEST_TEMPLATE_DIR", "/srv/templates");
    std::env::set_var("WORKER_TEST_LOG_PAYLOADS", "true");

    let config = WorkerConfig::from_env_with_prefix("WORKER_TEST").unwrap();

    assert_eq!(config.queue_url, "nats://queue:4222");
    assert_eq!(config.queue_name, "emails");
    assert_eq!(config.queue_consumer, "courier");
    assert_eq!(config.template_dir, "/srv/templates");
    assert!(config.log_payloads);

    std::env::remove_var("WORKER_TEST_QUEUE_URL");
    std::env::remove_var("WORKER_TEST_QUEUE_NAME");
    std::env::remove_var("WORKER_TEST_TEMPLATE_DIR");
    std::env::remove_var("WORKER_TEST_LOG_PAYLOADS");
}

#[test]
fn mailer_config_from_environment() {
    std::env::set_var("MAIL_TEST_SMTP_HOST", "smtp.example.com");
    std::env::set_var("MAIL_TEST_SMTP_PORT", "2525");
    std::env::set_var("MAIL_TEST_SMTP_FROM", "no-reply@example.com");

    let config = MailerConfig::from_env_with_prefix("MAIL_TEST").unwrap();

    assert_eq!(config.host, "smtp.example.com");
    assert_eq!(config.port, 2525);
    assert_eq!(config.from, "no-reply@example.com");
    assert_eq!(config.tls, "starttls");
    assert_eq!(config.timeout, 10);
    assert_eq!(config.username, None);

    std::env::remove_var("MAIL_TEST_SMTP_HOST");
    std::env::remove_var("MAIL_TEST_SMTP_PORT");
    std::env::remove_var("MAIL_TEST_SMTP_FROM");
}

#[test]
fn mailer_config_requires_host() {
    std::env::set_var("MAIL_MISSING_TEST_SMTP_FROM", "no-reply@example.com");

    assert!(MailerConfig::from_env_with_prefix("MAIL_MISSING_TEST").is_err());

    std::env::remove_var("MAIL_MISSING_TEST_SMTP_FROM");
}
