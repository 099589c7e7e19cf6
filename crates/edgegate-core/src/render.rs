//! Maintenance page rendering with Handlebars
//!
//! Two built-in templates: the full maintenance page and a bare variant for
//! crawlers. Every configuration string goes through Handlebars' HTML escaping
//! except `customCss`, which is inlined verbatim into the style block.

use handlebars::Handlebars;
use serde::Serialize;

use crate::locale::{self, Translation, DEFAULT_LANGUAGE};
use crate::prelude::*;
use edgegate_types::config::{MaintenanceConfig, DEFAULT_MESSAGE, DEFAULT_TITLE};
use edgegate_types::request::{Action, Decision};

const PAGE_TEMPLATE_NAME: &str = "maintenance";
const CRAWLER_TEMPLATE_NAME: &str = "maintenance-crawler";

/// HTTP date of the expected completion
const COMPLETION_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="noindex">
  <title>{{title}}</title>
  <style>
    body {
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
      background: #f5f5f5;
      display: flex;
      align-items: center;
      justify-content: center;
      min-height: 100vh;
      margin: 0;
      text-align: center;
    }
    .container {
      background: white;
      padding: 3rem;
      border-radius: 8px;
      box-shadow: 0 2px 4px rgba(0,0,0,0.1);
      max-width: 500px;
    }
    .logo { max-width: 200px; margin-bottom: 1rem; }
    h1 { color: #333; margin-bottom: 1rem; }
    p { color: #666; line-height: 1.6; }
    .notice { font-size: 0.9rem; color: #888; }
    .contact { margin-top: 2rem; font-size: 0.9rem; color: #999; }
    @media (prefers-color-scheme: dark) {
      body { background: #121212; }
      .container { background: #1e1e1e; }
      h1, p { color: #eee; }
    }
{{#if custom_css}}
    {{{custom_css}}}
{{/if}}
  </style>
</head>
<body>
  <div class="container" role="main"{{#if challenge}} data-challenge="{{challenge}}"{{/if}}>
{{#if logo_url}}
    <img class="logo" src="{{logo_url}}" alt="Logo">
{{/if}}
    <h1>{{title}}</h1>
    <p>{{message}}</p>
{{#if rate_limited}}
    <p class="notice">{{text.rate_limited}}</p>
{{/if}}
{{#if expected_completion}}
    <p class="notice">{{text.expected_completion}} {{expected_completion}}</p>
{{/if}}
{{#if contact_email}}
    <p class="contact">{{text.contact}} <a href="mailto:{{contact_email}}">{{contact_email}}</a></p>
{{/if}}
    <p class="notice">{{text.footer}}</p>
  </div>
</body>
</html>
"#;

const CRAWLER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{lang}}">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
  <meta name="robots" content="noindex">
  <meta name="description" content="{{message}}">
</head>
<body>
  <h1>{{title}}</h1>
  <p>{{message}}</p>
</body>
</html>
"#;

#[derive(Serialize)]
struct PageContext<'a> {
	lang: &'static str,
	text: &'static Translation,
	title: &'a str,
	message: &'a str,
	contact_email: Option<&'a str>,
	custom_css: Option<&'a str>,
	logo_url: Option<&'a str>,
	expected_completion: Option<String>,
	rate_limited: bool,
	challenge: Option<&'static str>,
}

#[derive(Serialize)]
struct CrawlerContext<'a> {
	lang: &'static str,
	title: &'a str,
	message: &'a str,
}

pub struct PageRenderer {
	handlebars: Handlebars<'static>,
}

impl PageRenderer {
	pub fn new() -> EgResult<Self> {
		let mut handlebars = Handlebars::new();
		handlebars.set_strict_mode(true);
		for (name, template) in
			[(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE), (CRAWLER_TEMPLATE_NAME, CRAWLER_TEMPLATE)]
		{
			handlebars
				.register_template_string(name, template)
				.map_err(|e| Error::Internal(format!("{} template: {}", name, e)))?;
		}
		Ok(Self { handlebars })
	}

	/// Render the page body for a non-pass decision
	///
	/// Depends only on the configuration and the decision. Falls back to a
	/// bare page rather than failing the request.
	pub fn render(&self, config: &MaintenanceConfig, decision: &Decision) -> String {
		let lang = decision.language.unwrap_or(DEFAULT_LANGUAGE);
		let text = locale::translation(lang);
		// Built-in defaults are shown in the visitor's language
		let title = if &*config.title == DEFAULT_TITLE { text.title } else { &*config.title };
		let message = if &*config.message == DEFAULT_MESSAGE { text.message } else { &*config.message };

		let rendered = if decision.crawler {
			self.handlebars.render(CRAWLER_TEMPLATE_NAME, &CrawlerContext { lang, title, message })
		} else {
			let context = PageContext {
				lang,
				text,
				title,
				message,
				contact_email: config.contact_email.as_deref(),
				custom_css: config.custom_css.as_deref(),
				logo_url: config.logo_url.as_deref(),
				expected_completion: config
					.window
					.as_ref()
					.map(|w| w.end_time.format(COMPLETION_FORMAT).to_string()),
				rate_limited: decision.action == Action::RateLimited,
				challenge: decision.challenge.as_ref().map(|action| action.as_str()),
			};
			self.handlebars.render(PAGE_TEMPLATE_NAME, &context)
		};

		match rendered {
			Ok(body) => body,
			Err(e) => {
				error!("Failed to render maintenance page: {}", e);
				fallback_page(lang, title, message)
			}
		}
	}
}

fn fallback_page(lang: &str, title: &str, message: &str) -> String {
	format!(
		"<!DOCTYPE html>\n<html lang=\"{lang}\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\
		<body><h1>{title}</h1><p>{message}</p></body></html>\n",
		title = handlebars::html_escape(title),
		message = handlebars::html_escape(message),
	)
}


// vim: ts=4
