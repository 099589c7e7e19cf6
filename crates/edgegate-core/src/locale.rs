//! Page languages
//!
//! Built-in strings of the maintenance page in every supported language, and
//! `Accept-Language` negotiation over them.

use serde::Serialize;

use edgegate_types::config::{DEFAULT_MESSAGE, DEFAULT_TITLE};

pub const DEFAULT_LANGUAGE: &str = "en";

/// Built-in page strings of one language
#[derive(Debug, Serialize)]
pub struct Translation {
	pub title: &'static str,
	pub message: &'static str,
	pub rate_limited: &'static str,
	pub expected_completion: &'static str,
	pub contact: &'static str,
	pub footer: &'static str,
}

static TRANSLATIONS: [(&str, Translation); 9] = [
	(
		"en",
		Translation {
			title: DEFAULT_TITLE,
			message: DEFAULT_MESSAGE,
			rate_limited: "You have sent too many requests. Please wait a moment before trying again.",
			expected_completion: "Expected completion:",
			contact: "Contact:",
			footer: "This site is temporarily unavailable due to planned maintenance.",
		},
	),
	(
		"es",
		Translation {
			title: "Mantenimiento del Sistema",
			message: "Actualmente estamos realizando un mantenimiento programado en nuestros sistemas.",
			rate_limited: "Ha enviado demasiadas solicitudes. Espere un momento antes de volver a intentarlo.",
			expected_completion: "Finalización prevista:",
			contact: "Contacto:",
			footer: "Este sitio está temporalmente no disponible debido a un mantenimiento planificado.",
		},
	),
	(
		"fr",
		Translation {
			title: "Maintenance du Système",
			message: "Nous effectuons actuellement une maintenance planifiée sur nos systèmes.",
			rate_limited: "Vous avez envoyé trop de requêtes. Veuillez patienter un instant avant de réessayer.",
			expected_completion: "Fin prévue :",
			contact: "Contact :",
			footer: "Ce site est temporairement indisponible en raison d'une maintenance planifiée.",
		},
	),
	(
		"de",
		Translation {
			title: "Systemwartung",
			message: "Wir führen derzeit eine geplante Wartung unserer Systeme durch.",
			rate_limited: "Sie haben zu viele Anfragen gesendet. Bitte warten Sie einen Moment, bevor Sie es erneut versuchen.",
			expected_completion: "Voraussichtliches Ende:",
			contact: "Kontakt:",
			footer: "Diese Website ist aufgrund geplanter Wartung vorübergehend nicht verfügbar.",
		},
	),
	(
		"it",
		Translation {
			title: "Manutenzione del Sistema",
			message: "Stiamo attualmente eseguendo una manutenzione programmata sui nostri sistemi.",
			rate_limited: "Hai inviato troppe richieste. Attendi un momento prima di riprovare.",
			expected_completion: "Completamento previsto:",
			contact: "Contatto:",
			footer: "Questo sito è temporaneamente non disponibile a causa di una manutenzione pianificata.",
		},
	),
	(
		"pt",
		Translation {
			title: "Manutenção do Sistema",
			message: "Estamos atualmente realizando uma manutenção programada em nossos sistemas.",
			rate_limited: "Você enviou muitas solicitações. Aguarde um momento antes de tentar novamente.",
			expected_completion: "Conclusão prevista:",
			contact: "Contato:",
			footer: "Este site está temporariamente indisponível devido à manutenção planejada.",
		},
	),
	(
		"ja",
		Translation {
			title: "システムメンテナンス",
			message: "現在、システムの定期メンテナンスを実施しています。",
			rate_limited: "リクエストが多すぎます。しばらく待ってから再度お試しください。",
			expected_completion: "完了予定：",
			contact: "お問い合わせ：",
			footer: "このサイトは計画的なメンテナンスのため一時的に利用できません。",
		},
	),
	(
		"zh",
		Translation {
			title: "系统维护",
			message: "我们目前正在对系统进行计划维护。",
			rate_limited: "您发送的请求过多。请稍候再试。",
			expected_completion: "预计完成时间：",
			contact: "联系方式：",
			footer: "由于计划维护，此网站暂时不可用。",
		},
	),
	(
		"ru",
		Translation {
			title: "Техническое обслуживание системы",
			message: "В настоящее время мы проводим плановое техническое обслуживание наших систем.",
			rate_limited: "Вы отправили слишком много запросов. Пожалуйста, подождите немного и повторите попытку.",
			expected_completion: "Ожидаемое завершение:",
			contact: "Контакт:",
			footer: "Этот сайт временно недоступен из-за планового технического обслуживания.",
		},
	),
];

fn supported(primary: &str) -> Option<&'static str> {
	TRANSLATIONS.iter().map(|(code, _)| *code).find(|code| code.eq_ignore_ascii_case(primary))
}

/// Strings for a language, English if it is not supported
pub fn translation(language: &str) -> &'static Translation {
	TRANSLATIONS
		.iter()
		.find(|(code, _)| code.eq_ignore_ascii_case(language))
		.map_or(&TRANSLATIONS[0].1, |(_, text)| text)
}

/// Quality weight of one `Accept-Language` entry; malformed weights count as 0
fn quality<'a>(mut params: impl Iterator<Item = &'a str>) -> f32 {
	params
		.find_map(|param| {
			let (name, value) = param.trim().split_once('=')?;
			name.trim().eq_ignore_ascii_case("q").then(|| {
				value.trim().parse::<f32>().ok().filter(|q| (0.0..=1.0).contains(q)).unwrap_or(0.0)
			})
		})
		.unwrap_or(1.0)
}

/// Pick the page language for an `Accept-Language` header
///
/// Ranges are tried by descending weight, in header order for equal weights,
/// matching on the primary subtag. No usable range yields [`DEFAULT_LANGUAGE`].
pub fn negotiate_language(accept_language: Option<&str>) -> &'static str {
	let Some(header) = accept_language else {
		return DEFAULT_LANGUAGE;
	};

	let mut ranges: Vec<(&str, f32)> = header
		.split(',')
		.filter_map(|entry| {
			let mut parts = entry.split(';');
			let tag = parts.next()?.trim();
			let q = quality(parts);
			(!tag.is_empty() && q > 0.0).then_some((tag, q))
		})
		.collect();
	ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

	ranges
		.into_iter()
		.find_map(|(tag, _)| {
			if tag == "*" {
				return Some(DEFAULT_LANGUAGE);
			}
			tag.split('-').next().and_then(supported)
		})
		.unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_primary_subtag_match() {
		assert_eq!(negotiate_language(Some("es-ES,es;q=0.9,en;q=0.8")), "es");
		assert_eq!(negotiate_language(Some("DE-at")), "de");
		assert_eq!(negotiate_language(Some("zh-Hant-TW")), "zh");
	}

	#[test]
	fn test_quality_order() {
		assert_eq!(negotiate_language(Some("fr-FR;q=0.8,es-ES;q=0.9,en;q=0.7")), "es");
		assert_eq!(negotiate_language(Some("it;q=0.5, ja")), "ja");
		// Equal weights keep header order
		assert_eq!(negotiate_language(Some("pt;q=0.8, ru;q=0.8")), "pt");
	}

	#[test]
	fn test_excluded_and_malformed_weights() {
		assert_eq!(negotiate_language(Some("fr;q=0, de;q=0.1")), "de");
		assert_eq!(negotiate_language(Some("fr;q=abc")), "en");
		assert_eq!(negotiate_language(Some("fr;q=1.5, it;q=0.2")), "it");
	}

	#[test]
	fn test_fallback_to_english() {
		assert_eq!(negotiate_language(None), "en");
		assert_eq!(negotiate_language(Some("")), "en");
		assert_eq!(negotiate_language(Some("da, nl;q=0.9")), "en");
		assert_eq!(negotiate_language(Some("da, *;q=0.5, fr;q=0.4")), "en");
		assert_eq!(negotiate_language(Some(" , ;q=1")), "en");
	}

	#[test]
	fn test_translation_table() {
		assert_eq!(translation("en").title, DEFAULT_TITLE);
		assert_eq!(translation("DE").title, "Systemwartung");
		assert_eq!(translation("xx").title, DEFAULT_TITLE);
		for (code, _) in &TRANSLATIONS {
			assert_eq!(supported(code), Some(*code));
		}
	}
}

// vim: ts=4
