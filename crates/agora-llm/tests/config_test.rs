use agora_llm::{ClientFactory, ModelClient, ModelConfig, ProviderDetails};

#[test]
fn test_parse_openai_document() {
    let doc = r#"
provider: openai
model: gpt-4o-mini
api_key: sk-test
temperature: 0.7
max_tokens: 1024
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.provider_name(), "openai");
    assert_eq!(config.temperature, Some(0.7));
    assert_eq!(config.max_tokens, Some(1024));

    match config.provider {
        ProviderDetails::OpenAI { base_url } => assert!(base_url.is_none()),
        _ => panic!("Expected OpenAI provider"),
    }
}

#[test]
fn test_parse_openai_document_with_base_url() {
    let doc = r#"
provider: openai
model: local-model
api_key: not-needed
base_url: http://localhost:8080/v1
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    match config.provider {
        ProviderDetails::OpenAI { base_url } => {
            assert_eq!(base_url.as_deref(), Some("http://localhost:8080/v1"));
        }
        _ => panic!("Expected OpenAI provider"),
    }
}

#[test]
fn test_parse_azure_document() {
    let doc = r#"
provider: azure_openai
model: my-gpt4-deployment
api_key: azure-test
endpoint: https://my-resource.openai.azure.com
api_version: 2024-02-15-preview
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    assert_eq!(config.provider_name(), "azure_openai");

    match config.provider {
        ProviderDetails::AzureOpenAI { endpoint, api_version } => {
            assert_eq!(endpoint, "https://my-resource.openai.azure.com");
            assert_eq!(api_version, "2024-02-15-preview");
        }
        _ => panic!("Expected Azure provider"),
    }
}

#[test]
fn test_api_key_resolved_from_environment() {
    std::env::set_var("AGORA_CONFIG_TEST_KEY", "sk-from-env");

    let doc = r#"
provider: openai
model: gpt-4o-mini
api_key_env: AGORA_CONFIG_TEST_KEY
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    assert_eq!(config.resolve_api_key().unwrap(), "sk-from-env");
}

#[test]
fn test_unset_env_var_is_an_error() {
    let doc = r#"
provider: openai
model: gpt-4o-mini
api_key_env: AGORA_CONFIG_TEST_KEY_UNSET
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    let err = config.resolve_api_key().unwrap_err();
    assert!(err.to_string().contains("AGORA_CONFIG_TEST_KEY_UNSET"));
}

#[test]
fn test_missing_model_field_fails() {
    let doc = r#"
provider: openai
api_key: sk-test
"#;

    assert!(ModelConfig::from_yaml_str(doc).is_err());
}

#[test]
fn test_factory_builds_openai_client() {
    let doc = r#"
provider: openai
model: gpt-4o-mini
api_key: sk-test
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    assert!(ClientFactory::create_chat_client(&config).is_ok());
}

#[test]
fn test_factory_builds_azure_client() {
    let doc = r#"
provider: azure_openai
model: my-gpt4-deployment
api_key: azure-test
endpoint: https://my-resource.openai.azure.com
api_version: 2024-02-15-preview
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    assert!(ClientFactory::create_chat_client(&config).is_ok());
}

#[test]
fn test_model_client_seeds_sampling_defaults() {
    let doc = r#"
provider: openai
model: gpt-4o-mini
api_key: sk-test
temperature: 0.2
max_tokens: 256
"#;

    let config = ModelConfig::from_yaml_str(doc).unwrap();
    let model = ModelClient::from_config(&config).unwrap();

    assert_eq!(model.model(), "gpt-4o-mini");

    let request = model.request(vec![agora_llm::Message::human("hi")]);
    assert_eq!(request.options.temperature, Some(0.2));
    assert_eq!(request.options.max_tokens, Some(256));
    assert!(request.options.tools.is_none());
}

#[test]
fn test_model_config_from_file() {
    let path = std::env::temp_dir().join(format!(
        "agora-model-config-{}.yaml",
        std::process::id()
    ));
    std::fs::write(
        &path,
        "provider: openai\nmodel: gpt-4o-mini\napi_key: sk-test\n",
    )
    .unwrap();

    let config = ModelConfig::from_yaml_file(&path).unwrap();
    assert_eq!(config.model, "gpt-4o-mini");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_error_names_the_path() {
    let err = ModelConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}
