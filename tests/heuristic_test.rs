use email_intake::detect_email;

#[test]
fn test_two_headers_make_an_email() {
    let record = detect_email("From: a@b.com\nSubject: Test\n").unwrap();

    assert_eq!(record.from, "a@b.com");
    assert_eq!(record.subject, "Test");
    assert_eq!(record.to, "");
    assert_eq!(record.date, "");
    assert_eq!(record.email_body, "");
    assert!(record.attachments.is_empty());
    assert!(record.error.is_none());
}

#[test]
fn test_single_header_is_not_an_email() {
    assert!(detect_email("Subject: Quarterly report\nRevenue grew.\n").is_none());
}

#[test]
fn test_no_headers_is_not_an_email() {
    assert!(detect_email("Just a plain document about escrow.").is_none());
    assert!(detect_email("").is_none());
}

#[test]
fn test_all_headers_and_body() {
    let text = "FROM:   Jane <jane@example.com>\r\n\
                to: servicing@bank.example\r\n\
                Date: Mon, 3 Feb 2025 09:30:00 -0500\r\n\
                subject: Principal paydown\r\n\
                \r\n\
                Please apply the attached payment to principal.\r\n\
                Thanks\r\n";

    let record = detect_email(text).unwrap();

    assert_eq!(record.from, "Jane <jane@example.com>");
    assert_eq!(record.to, "servicing@bank.example");
    assert_eq!(record.date, "Mon, 3 Feb 2025 09:30:00 -0500");
    assert_eq!(record.subject, "Principal paydown");
    assert_eq!(
        record.email_body,
        "Please apply the attached payment to principal.\r\nThanks"
    );
}

#[test]
fn test_body_starts_after_last_header() {
    let text = "Subject: Payoff\nSome preamble\nFrom: lender@bank.example\nBody text here\n";

    let record = detect_email(text).unwrap();

    assert_eq!(record.email_body, "Body text here");
}

#[test]
fn test_header_without_line_end_does_not_match() {
    // The trailing Subject has no terminator, leaving only one match
    assert!(detect_email("From: a@b.com\nSubject: Test").is_none());
}
