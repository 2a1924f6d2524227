use crate::error::{PubMedError, Result};
use crate::pubmed::models::{Paper, UNKNOWN_DATE};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::BufReader;
use std::sync::LazyLock;
use tracing::debug;

/// Case-sensitive substrings that flag an affiliation as commercial/industry
pub const NON_ACADEMIC_KEYWORDS: [&str; 7] = [
    "Inc",
    "Ltd",
    "LLC",
    "Corporation",
    "Pharmaceuticals",
    "Biotech",
    "GmbH",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

/// Test whether an affiliation string names a commercial organization
pub fn is_non_academic(affiliation: &str) -> bool {
    NON_ACADEMIC_KEYWORDS
        .iter()
        .any(|keyword| affiliation.contains(keyword))
}

/// Extract the first email-shaped substring from affiliation text
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// Parse papers from an EFetch XML response
///
/// Walks every `PubmedArticle` element in document order, classifying each
/// author's affiliations against [`NON_ACADEMIC_KEYWORDS`] and scanning them
/// for email addresses. Authors missing either a `ForeName` or `LastName` are
/// skipped entirely and contribute nothing to any output field.
///
/// An article without a `PMID` or `ArticleTitle` fails the whole extraction
/// with [`PubMedError::MissingField`]; malformed XML fails with
/// [`PubMedError::XmlParseError`]. An empty input yields zero papers.
pub fn parse_papers_from_xml(xml: &str) -> Result<Vec<Paper>> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    reader.config_mut().trim_text(true);

    let mut papers: Vec<Paper> = Vec::new();

    // Per-article state
    let mut in_article = false;
    let mut pmid = String::new();
    let mut title = String::new();
    let mut year = String::new();
    let mut non_academic_authors: Vec<String> = Vec::new();
    let mut company_affiliations: Vec<String> = Vec::new();
    let mut corresponding_email: Option<String> = None;

    // Element flags
    let mut in_pmid = false;
    let mut in_article_title = false;
    let mut in_pub_date = false;
    let mut in_year = false;
    let mut in_author = false;
    let mut in_last_name = false;
    let mut in_fore_name = false;
    let mut in_affiliation = false;

    // Per-author state
    let mut current_author_last = String::new();
    let mut current_author_fore = String::new();
    let mut current_author_affiliations: Vec<String> = Vec::new();
    let mut current_affiliation_text = String::new();

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"PubmedArticle" => {
                    in_article = true;
                    pmid.clear();
                    title.clear();
                    year.clear();
                    non_academic_authors.clear();
                    company_affiliations.clear();
                    corresponding_email = None;
                }
                b"PMID" if in_article && !in_author => in_pmid = true,
                b"ArticleTitle" if in_article => in_article_title = true,
                b"PubDate" if in_article => in_pub_date = true,
                b"Year" if in_pub_date => in_year = true,
                b"Author" if in_article => {
                    in_author = true;
                    current_author_last.clear();
                    current_author_fore.clear();
                    current_author_affiliations.clear();
                }
                b"LastName" if in_author => in_last_name = true,
                b"ForeName" if in_author => in_fore_name = true,
                b"Affiliation" if in_author => {
                    in_affiliation = true;
                    current_affiliation_text.clear();
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"PMID" => in_pmid = false,
                b"ArticleTitle" => in_article_title = false,
                b"PubDate" => {
                    in_pub_date = false;
                    in_year = false;
                }
                b"Year" => in_year = false,
                b"LastName" => in_last_name = false,
                b"ForeName" => in_fore_name = false,
                b"Affiliation" => {
                    if in_affiliation && !current_affiliation_text.is_empty() {
                        current_author_affiliations.push(current_affiliation_text.clone());
                    }
                    in_affiliation = false;
                }
                b"Author" => {
                    if in_author
                        && !current_author_fore.is_empty()
                        && !current_author_last.is_empty()
                    {
                        let full_name =
                            format!("{} {}", current_author_fore, current_author_last);

                        let matching: Vec<&String> = current_author_affiliations
                            .iter()
                            .filter(|aff| is_non_academic(aff))
                            .collect();
                        if !matching.is_empty() {
                            non_academic_authors.push(full_name);
                            for aff in matching {
                                if !company_affiliations.contains(aff) {
                                    company_affiliations.push(aff.clone());
                                }
                            }
                        }

                        // First named author with an email-bearing affiliation wins
                        if corresponding_email.is_none() {
                            corresponding_email = current_author_affiliations
                                .iter()
                                .find_map(|aff| extract_email(aff));
                        }
                    }
                    in_author = false;
                }
                b"PubmedArticle" => {
                    if in_article {
                        if pmid.is_empty() {
                            return Err(PubMedError::MissingField { field: "PMID" });
                        }
                        if title.is_empty() {
                            return Err(PubMedError::MissingField { field: "ArticleTitle" });
                        }
                        papers.push(Paper {
                            pmid: pmid.clone(),
                            title: title.clone(),
                            pub_date: if year.is_empty() {
                                UNKNOWN_DATE.to_string()
                            } else {
                                year.clone()
                            },
                            non_academic_authors: non_academic_authors.clone(),
                            company_affiliations: company_affiliations.clone(),
                            corresponding_email: corresponding_email.take(),
                        });
                        in_article = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_article {
                    let text = e
                        .unescape()
                        .map_err(|_| PubMedError::XmlParseError {
                            message: "Failed to decode XML text".to_string(),
                        })?
                        .into_owned();

                    if in_pmid && pmid.is_empty() {
                        pmid = text;
                    } else if in_article_title {
                        // Titles may carry inline markup, splitting the text
                        // across events
                        title.push_str(&text);
                    } else if in_year && year.is_empty() {
                        year = text;
                    } else if in_last_name && in_author {
                        current_author_last = text;
                    } else if in_fore_name && in_author {
                        current_author_fore = text;
                    } else if in_affiliation && in_author {
                        if !current_affiliation_text.is_empty() {
                            current_affiliation_text.push(' ');
                        }
                        current_affiliation_text.push_str(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(PubMedError::XmlParseError {
                    message: format!("XML parsing error: {}", e),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(papers_parsed = papers.len(), "Completed XML extraction");

    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_xml(pmid: &str, title: &str, year: Option<&str>, authors: &str) -> String {
        let pub_date = match year {
            Some(y) => format!("<PubDate><Year>{}</Year><Month>Jan</Month></PubDate>", y),
            None => "<PubDate><MedlineDate>2019 Nov-Dec</MedlineDate></PubDate>".to_string(),
        };
        format!(
            r#"<?xml version="1.0" ?>
<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID Version="1">{pmid}</PMID>
        <Article>
            <Journal>
                <JournalIssue>{pub_date}</JournalIssue>
                <Title>Test Journal</Title>
            </Journal>
            <ArticleTitle>{title}</ArticleTitle>
            <AuthorList>{authors}</AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#
        )
    }

    fn author_xml(fore: &str, last: &str, affiliation: Option<&str>) -> String {
        let aff = affiliation
            .map(|a| {
                format!(
                    "<AffiliationInfo><Affiliation>{}</Affiliation></AffiliationInfo>",
                    a
                )
            })
            .unwrap_or_default();
        format!(
            "<Author><LastName>{}</LastName><ForeName>{}</ForeName>{}</Author>",
            last, fore, aff
        )
    }

    #[test]
    fn test_industry_author_extraction() {
        let xml = article_xml(
            "12345",
            "Test Study",
            Some("2020"),
            &author_xml("Jane", "Doe", Some("Pfizer Inc, jane@pfizer.com")),
        );

        let papers = parse_papers_from_xml(&xml).unwrap();
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.pmid, "12345");
        assert_eq!(paper.title, "Test Study");
        assert_eq!(paper.pub_date, "2020");
        assert_eq!(paper.non_academic_authors, vec!["Jane Doe"]);
        assert_eq!(
            paper.company_affiliations,
            vec!["Pfizer Inc, jane@pfizer.com"]
        );
        assert_eq!(
            paper.corresponding_email.as_deref(),
            Some("jane@pfizer.com")
        );
    }

    #[test]
    fn test_academic_author_not_flagged() {
        let xml = article_xml(
            "12345",
            "Test Study",
            Some("2020"),
            &author_xml("Jane", "Doe", Some("University of Nowhere")),
        );

        let papers = parse_papers_from_xml(&xml).unwrap();
        let paper = &papers[0];
        assert!(paper.non_academic_authors.is_empty());
        assert!(paper.company_affiliations.is_empty());
        assert!(paper.corresponding_email.is_none());
        assert_eq!(paper.email_or_sentinel(), "N/A");
    }

    #[test]
    fn test_missing_year_uses_sentinel() {
        let xml = article_xml(
            "12345",
            "Test Study",
            None,
            &author_xml("Jane", "Doe", None),
        );

        let papers = parse_papers_from_xml(&xml).unwrap();
        assert_eq!(papers[0].pub_date, "Unknown");
    }

    #[test]
    fn test_author_missing_name_component_skipped() {
        // Missing ForeName: the author must not appear anywhere, and their
        // affiliation must not contribute a keyword match or an email
        let authors = format!(
            "{}{}",
            "<Author><LastName>Doe</LastName><AffiliationInfo><Affiliation>Acme Inc, anon@acme.com</Affiliation></AffiliationInfo></Author>",
            author_xml("John", "Smith", Some("University of Somewhere")),
        );
        let xml = article_xml("12345", "Test Study", Some("2020"), &authors);

        let papers = parse_papers_from_xml(&xml).unwrap();
        let paper = &papers[0];
        assert!(paper.non_academic_authors.is_empty());
        assert!(paper.company_affiliations.is_empty());
        assert!(paper.corresponding_email.is_none());
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        let xml = article_xml(
            "12345",
            "Test Study",
            Some("2020"),
            &author_xml("Jane", "Doe", Some("acme inc")),
        );

        let papers = parse_papers_from_xml(&xml).unwrap();
        assert!(papers[0].non_academic_authors.is_empty());
    }

    #[test]
    fn test_all_keywords_flag() {
        for keyword in NON_ACADEMIC_KEYWORDS {
            let affiliation = format!("Example {} research unit", keyword);
            assert!(is_non_academic(&affiliation), "keyword: {}", keyword);
        }
        assert!(!is_non_academic("Example university research unit"));
    }

    #[test]
    fn test_duplicate_affiliations_collapsed() {
        let authors = format!(
            "{}{}",
            author_xml("Jane", "Doe", Some("Genentech Biotech")),
            author_xml("John", "Smith", Some("Genentech Biotech")),
        );
        let xml = article_xml("12345", "Test Study", Some("2020"), &authors);

        let papers = parse_papers_from_xml(&xml).unwrap();
        let paper = &papers[0];
        assert_eq!(paper.non_academic_authors, vec!["Jane Doe", "John Smith"]);
        assert_eq!(paper.company_affiliations, vec!["Genentech Biotech"]);
    }

    #[test]
    fn test_first_email_wins() {
        let authors = format!(
            "{}{}{}",
            author_xml("Ann", "First", Some("Somewhere University")),
            author_xml("Bob", "Second", Some("Roche Ltd, bob@roche.com")),
            author_xml("Cat", "Third", Some("Bayer GmbH, cat@bayer.com")),
        );
        let xml = article_xml("12345", "Test Study", Some("2020"), &authors);

        let papers = parse_papers_from_xml(&xml).unwrap();
        assert_eq!(
            papers[0].corresponding_email.as_deref(),
            Some("bob@roche.com")
        );
    }

    #[test]
    fn test_multiple_articles_are_independent() {
        let xml = format!(
            r#"<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID>111</PMID>
        <Article>
            <ArticleTitle>First</ArticleTitle>
            <AuthorList>{}</AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
<PubmedArticle>
    <MedlineCitation>
        <PMID>222</PMID>
        <Article>
            <ArticleTitle>Second</ArticleTitle>
            <AuthorList>{}</AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#,
            author_xml("Jane", "Doe", Some("Moderna Inc, jane@moderna.com")),
            author_xml("John", "Smith", Some("Open University")),
        );

        let papers = parse_papers_from_xml(&xml).unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].pmid, "111");
        assert_eq!(papers[0].non_academic_authors, vec!["Jane Doe"]);
        assert_eq!(
            papers[0].corresponding_email.as_deref(),
            Some("jane@moderna.com")
        );
        // No cross-record leakage
        assert_eq!(papers[1].pmid, "222");
        assert!(papers[1].non_academic_authors.is_empty());
        assert!(papers[1].corresponding_email.is_none());
        assert_eq!(papers[1].pub_date, "Unknown");
    }

    #[test]
    fn test_reference_pmid_does_not_overwrite() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID>333</PMID>
        <Article><ArticleTitle>With References</ArticleTitle></Article>
        <CommentsCorrectionsList>
            <CommentsCorrections><PMID>999</PMID></CommentsCorrections>
        </CommentsCorrectionsList>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

        let papers = parse_papers_from_xml(xml).unwrap();
        assert_eq!(papers[0].pmid, "333");
    }

    #[test]
    fn test_missing_pmid_fails() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <Article><ArticleTitle>No Identifier</ArticleTitle></Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

        let err = parse_papers_from_xml(xml).unwrap_err();
        assert!(matches!(err, PubMedError::MissingField { field: "PMID" }));
    }

    #[test]
    fn test_missing_title_fails() {
        let xml = r#"<PubmedArticleSet>
<PubmedArticle>
    <MedlineCitation>
        <PMID>444</PMID>
        <Article></Article>
    </MedlineCitation>
</PubmedArticle>
</PubmedArticleSet>"#;

        let err = parse_papers_from_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            PubMedError::MissingField {
                field: "ArticleTitle"
            }
        ));
    }

    #[test]
    fn test_malformed_xml_fails() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation>";
        let err = parse_papers_from_xml(xml).unwrap_err();
        assert!(matches!(err, PubMedError::XmlParseError { .. }));
    }

    #[test]
    fn test_empty_input_yields_no_papers() {
        assert!(parse_papers_from_xml("").unwrap().is_empty());
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("Pfizer Inc, New York. Contact: jane.doe+lab@pfizer.com."),
            Some("jane.doe+lab@pfizer.com".to_string())
        );
        assert_eq!(extract_email("No address here"), None);
        // Top-level label needs at least two letters
        assert_eq!(extract_email("broken@host.x"), None);
    }
}
