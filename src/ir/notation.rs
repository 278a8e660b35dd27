//! Textual type notation: `List<out T?>`, `Map<String, *>`, `raw List`,
//! `Array<IntArray>`, `dynamic`.
//!
//! Bare single-segment names resolve to type parameters in scope before
//! classes; dotted names are looked up as fully qualified class names.

use crate::ir::{
    ClassId, Classifier, DeclParent, IrGraph, IrType, SimpleType, TypeArgument, TypeParamId,
    Variance,
};
use nom::{
    IResult, Parser as NomParser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNotation {
    Dynamic,
    Named {
        path: String,
        args: Option<Vec<ArgNotation>>,
        nullable: bool,
        raw: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgNotation {
    Star,
    Projection(Variance, TypeNotation),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("cannot parse type `{input}`")]
    Syntax { input: String },
    #[error("unknown type name `{name}`")]
    UnknownName { name: String },
    #[error("type parameter `{name}` cannot take type arguments")]
    ArgumentsOnTypeParameter { name: String },
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn path(input: &str) -> IResult<&str, String> {
    map(separated_list1(char('.'), identifier), |parts| parts.join(".")).parse(input)
}

fn variance(input: &str) -> IResult<&str, Variance> {
    let (input, keyword) = opt(terminated(alt((tag("in"), tag("out"))), multispace1)).parse(input)?;
    let variance = match keyword {
        Some("in") => Variance::In,
        Some(_) => Variance::Out,
        None => Variance::Invariant,
    };
    Ok((input, variance))
}

fn argument(input: &str) -> IResult<&str, ArgNotation> {
    let (input, _) = multispace0(input)?;
    alt((
        map(char('*'), |_| ArgNotation::Star),
        map(pair(variance, type_notation), |(variance, ty)| {
            ArgNotation::Projection(variance, ty)
        }),
    ))
    .parse(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<ArgNotation>> {
    delimited(
        preceded(multispace0, char('<')),
        separated_list1(preceded(multispace0, char(',')), argument),
        preceded(multispace0, char('>')),
    )
    .parse(input)
}

fn type_notation(input: &str) -> IResult<&str, TypeNotation> {
    let (input, _) = multispace0(input)?;
    let (input, raw) = opt(terminated(tag("raw"), multispace1)).parse(input)?;
    let (input, path) = path(input)?;
    let (input, args) = opt(arguments).parse(input)?;
    let (input, question) = opt(preceded(multispace0, char('?'))).parse(input)?;
    if path == "dynamic" && args.is_none() && raw.is_none() {
        return Ok((input, TypeNotation::Dynamic));
    }
    Ok((
        input,
        TypeNotation::Named {
            path,
            args,
            nullable: question.is_some(),
            raw: raw.is_some(),
        },
    ))
}

pub fn parse_type(input: &str) -> Result<TypeNotation, NotationError> {
    all_consuming(terminated(type_notation, multispace0))
        .parse(input)
        .map(|(_, ty)| ty)
        .map_err(|_| NotationError::Syntax {
            input: input.to_string(),
        })
}

fn type_param_in_scope(graph: &IrGraph, name: &str, scope: Option<DeclParent>) -> Option<TypeParamId> {
    let mut current = scope;
    while let Some(parent) = current {
        if let Some(found) = graph
            .type_parameters_of(parent)
            .iter()
            .copied()
            .find(|id| graph.type_param(*id).name == name)
        {
            return Some(found);
        }
        current = graph.parent_of(parent);
    }
    None
}

fn resolve_argument(
    graph: &IrGraph,
    arg: &ArgNotation,
    scope: Option<DeclParent>,
) -> Result<TypeArgument, NotationError> {
    match arg {
        ArgNotation::Star => Ok(TypeArgument::Star),
        ArgNotation::Projection(variance, ty) => Ok(TypeArgument::projected(
            *variance,
            resolve(graph, ty, scope)?,
        )),
    }
}

pub fn resolve(
    graph: &IrGraph,
    notation: &TypeNotation,
    scope: Option<DeclParent>,
) -> Result<IrType, NotationError> {
    let (path, args, nullable, raw) = match notation {
        TypeNotation::Dynamic => return Ok(IrType::Dynamic),
        TypeNotation::Named {
            path,
            args,
            nullable,
            raw,
        } => (path, args, *nullable, *raw),
    };
    if !path.contains('.') {
        if let Some(param) = type_param_in_scope(graph, path, scope) {
            if args.is_some() {
                return Err(NotationError::ArgumentsOnTypeParameter { name: path.clone() });
            }
            return Ok(IrType::param(param).with_nullability(nullable));
        }
    }
    let class: ClassId = graph
        .find_class(path)
        .ok_or_else(|| NotationError::UnknownName { name: path.clone() })?;
    let arguments = match args {
        Some(list) => list
            .iter()
            .map(|arg| resolve_argument(graph, arg, scope))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(IrType::Simple(SimpleType {
        classifier: Classifier::Class(class),
        arguments,
        nullable,
        raw,
    }))
}
