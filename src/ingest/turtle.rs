//! Turtle to [`Triple`] conversion.

use std::io::BufRead;

use rio_api::model::{Literal, Subject, Term};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleError, TurtleParser};

use crate::store::Triple;

/// Parse a whole Turtle document.
///
/// Literal objects keep only their lexical form; language tags and datatypes
/// are dropped. Blank node labels only mean something inside one document, so
/// they are written as `_:{scope}-{id}` with a `scope` unique to the load.
///
/// # Errors
///
/// Returns the first syntax or I/O error encountered.
pub fn parse_turtle<R: BufRead>(reader: R, scope: &str) -> Result<Vec<Triple>, TurtleError> {
    let mut triples = Vec::new();
    TurtleParser::new(reader, None).parse_all(&mut |t| -> Result<(), TurtleError> {
        triples.push(Triple::new(
            subject_text(&t.subject, scope),
            t.predicate.iri,
            object_text(&t.object, scope),
        ));
        Ok(())
    })?;
    Ok(triples)
}

fn subject_text(subject: &Subject<'_>, scope: &str) -> String {
    match subject {
        Subject::NamedNode(node) => node.iri.to_string(),
        Subject::BlankNode(node) => format!("_:{scope}-{}", node.id),
        other => other.to_string(),
    }
}

fn object_text(object: &Term<'_>, scope: &str) -> String {
    match object {
        Term::NamedNode(node) => node.iri.to_string(),
        Term::BlankNode(node) => format!("_:{scope}-{}", node.id),
        Term::Literal(
            Literal::Simple { value }
            | Literal::LanguageTaggedString { value, .. }
            | Literal::Typed { value, .. },
        ) => (*value).to_string(),
        other => other.to_string(),
    }
}
