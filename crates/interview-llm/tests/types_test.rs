use interview_llm::Message;

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are helpful").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
}

#[test]
fn test_message_content() {
    let msg = Message::human("What is EBITDA?");
    assert_eq!(msg.content(), "What is EBITDA?");
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
}

#[test]
fn test_message_serialization_system() {
    let msg = Message::system("Rules");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"system\""));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"user","content":"Sure?"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg, Message::human("Sure?"));
}

#[test]
fn test_only_outbound_roles_exist() {
    let json = r#"{"role":"assistant","content":"Earlier answer"}"#;
    assert!(serde_json::from_str::<Message>(json).is_err());
}
