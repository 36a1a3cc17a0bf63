//! Static manifest corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of whole manifests, the way an
//! operator would paste them. Every manifest in a corpus yields exactly
//! [`CORPUS_EXPECTED`] targets with the emails in [`CORPUS_EMAILS`].

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

pub const CORPUS_EMAILS: &[&str] = &["ann@lab.test", "bo@lab.test"];
pub const CORPUS_EXPECTED: usize = 2;

/// JSON arrays in snake_case, camelCase and mixed capitalisation.
pub const CORPUS_JSON: &[&str] = &[
    r#"[{"email":"ann@lab.test","name":"Ann"},{"email":"bo@lab.test"}]"#,
    r#"[{"Email":"ann@lab.test","impervaAccountId":"1"},{"EMAIL":"bo@lab.test","durationMinutes":"2h"}]"#,
    "[\n  {\"email\": \"ann@lab.test\", \"isSubAccount\": \"yes\"},\n  {\"email\": \"bo@lab.test\", \"scenario\": \"api\"},\n  {\"name\": \"no email\"}\n]",
    r#"[{"email":"ann@lab.test"},"stray string",{"email":"bo@lab.test"},{"email":"no-at-sign"}]"#,
];

/// Comma- and semicolon-delimited rows, with and without a header.
pub const CORPUS_DELIMITED: &[&str] = &[
    "Name,Email,ImpervaAccountId,Org,IsSubAccount(YES/NO),ScenarioId,DurationMinutes\nAnn,ann@lab.test,1,Acme,YES,air,240\nBo,bo@lab.test,2,Beta,NO,api,120",
    "name;email\nAnn;ann@lab.test\nBo;bo@lab.test",
    "Ann,ann@lab.test\n\n   \nBo,bo@lab.test,,,,,,extra,cells",
    "Ann,ann@lab.test\r\nno email here,at all\r\nBo,bo@lab.test\r\n",
];

/// One bare address per line.
pub const CORPUS_BARE: &[&str] = &[
    "ann@lab.test\nbo@lab.test",
    "  ann@lab.test  \n\n\tbo@lab.test\n",
    "ann@lab.test\nnot-an-address\nbo@lab.test",
];

/// Build a headed CSV manifest of `n` generated participants. Returns the
/// manifest text and the emails in row order.
pub fn generated_csv(n: usize) -> (String, Vec<String>) {
    let mut text = String::from("Name,Email,ImpervaAccountId,Org,IsSubAccount(YES/NO),ScenarioId,DurationMinutes\n");
    let mut emails = Vec::with_capacity(n);
    for i in 0..n {
        let name: String = Name().fake::<String>().replace([',', ';'], "");
        let email: String = SafeEmail().fake();
        let sub = if i % 2 == 0 { "YES" } else { "NO" };
        text.push_str(&format!("{name},{email},{},Org {i},{sub},air,{}\n", 10_000 + i, 30 + i));
        emails.push(email);
    }
    (text, emails)
}
