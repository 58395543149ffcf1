use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// Ten chat history records spread over 2024-03-01, 2024-03-02 and
/// 2024-03-03 (UTC), in the mix of timestamp formats the backend has used.
pub fn history_fixture() -> &'static str {
    return r#"
[
  {"_id": "h0", "question": "What is the library timing?", "answer": "<p>9 AM to 8 PM on weekdays.</p>", "timestamp": "2024-03-01T09:15:00"},
  {"_id": "h1", "question": "Is the library open on Sunday?", "answer": "No.", "timestamp": "2024-03-01T10:00:00.512000"},
  {"_id": "h2", "question": "How do I renew a book?", "answer": "Use the student portal.", "timestamp": "2024-03-01T11:45:00Z"},
  {"_id": "h3", "question": "Where is the admin block?", "answer": "Next to the main gate.", "timestamp": "Fri, 01 Mar 2024 14:00:00 GMT"},
  {"_id": "h4", "question": "When are exams?", "answer": "<ul><li>Midterms in April</li><li>Finals in June</li></ul>", "timestamp": "2024-03-02T08:00:00"},
  {"_id": "h5", "question": "What is the fee deadline?", "answer": "March 31.", "timestamp": "2024-03-02T12:30:00+00:00"},
  {"_id": "h6", "question": "Who is the hostel warden?", "answer": "", "timestamp": "2024-03-02T17:20:00"},
  {"_id": "h7", "question": "Is there a canteen?", "answer": "Yes, near block C.", "timestamp": "2024-03-03T07:05:00"},
  {"_id": "h8", "question": "How do I get a bus pass?", "answer": "Apply at the transport office.", "timestamp": "2024-03-03T13:10:00", "username": "asha"},
  {"_id": "h9", "question": "What is the Wi-Fi password?", "answer": "Ask the IT helpdesk &amp; bring your ID.", "timestamp": "2024-03-03T18:40:00"}
]
"#;
}
