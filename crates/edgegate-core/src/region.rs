//! ISO 3166-1 alpha-2 country codes

/// Officially assigned alpha-2 codes, sorted
const ISO_3166_ALPHA2: &[&str] = &[
	"AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
	"BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
	"BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
	"CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
	"EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
	"GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
	"HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
	"JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
	"LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
	"ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
	"NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
	"PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
	"SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
	"ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
	"TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
	"VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// Normalize a region code to its canonical upper-case form if it is known
pub fn canonical_region(code: &str) -> Option<&'static str> {
	let code = code.trim();
	if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
		return None;
	}
	let upper = code.to_ascii_uppercase();
	ISO_3166_ALPHA2.binary_search(&upper.as_str()).ok().map(|idx| ISO_3166_ALPHA2[idx])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_table_is_sorted() {
		assert!(ISO_3166_ALPHA2.windows(2).all(|w| w[0] < w[1]));
		assert_eq!(ISO_3166_ALPHA2.len(), 249);
	}

	#[test]
	fn test_known_codes() {
		assert_eq!(canonical_region("US"), Some("US"));
		assert_eq!(canonical_region("gb"), Some("GB"));
		assert_eq!(canonical_region(" ca "), Some("CA"));
	}

	#[test]
	fn test_rejected_codes() {
		for code in ["USA", "U", "XX", "T1", ""] {
			assert_eq!(canonical_region(code), None, "{:?} accepted", code);
		}
	}
}

// vim: ts=4
