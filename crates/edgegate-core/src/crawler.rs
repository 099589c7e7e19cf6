//! Crawler detection by user agent

const CRAWLER_MARKERS: &[&str] = &[
	"bot",
	"spider",
	"crawl",
	"lighthouse",
	"slurp",
	"pingdom",
	"archive.org",
	"facebookexternalhit",
	"whatsapp",
];

/// Whether a user agent belongs to a search engine, monitor or link previewer
pub fn is_crawler(user_agent: Option<&str>) -> bool {
	let Some(user_agent) = user_agent else {
		return false;
	};
	let user_agent = user_agent.to_ascii_lowercase();
	CRAWLER_MARKERS.iter().any(|marker| user_agent.contains(marker))
}


// vim: ts=4
