use rocket::Route;
use rocket::get;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;

const INDEX_PAGE: &str = include_str!("../../../static/index.html");
const LOGIN_PAGE: &str = include_str!("../../../static/login.html");
const NOTICE_SLOT: &str = "{{notice}}";

pub fn generate_page_routes() -> Vec<Route> {
    routes![index_page, login_page]
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Fill the page's notice slot with the pending flash message, if any.
fn render_page(page: &str, flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    let notice = match flash {
        Some(flash) => format!(
            r#"<p class="notice {}">{}</p>"#,
            escape_html(flash.kind()),
            escape_html(flash.message())
        ),
        None => String::new(),
    };
    RawHtml(page.replace(NOTICE_SLOT, &notice))
}

#[get("/")]
pub fn index_page(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    render_page(INDEX_PAGE, flash)
}

#[get("/login")]
pub fn login_page(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    render_page(LOGIN_PAGE, flash)
}
