//! Command line parsing

use core_kernel::{ClaimId, DocumentId, PolicyId};
use domain_claims::{PolicyDecision, ReviewDecision};

use crate::error::CliError;

pub const USAGE: &str = "\
Usage: claims-review <command>

Commands:
  list                                              List claims awaiting review
  show <claim_id>                                   Show a claim and its documents
  extract <claim_id> <document_id>                  Run extraction for a document
  review <claim_id> <document_id> approve|reject [remarks...]
                                                    Record a review decision
  policy <policy_id> approve|reject [reason...]     Approve or reject a policy

Environment:
  CLAIMS_ACCESS_TOKEN     Operator access token
  CLAIMS_API_BASE_URL     Claims backend (default http://localhost:8000/api)
  CLAIMS_STORAGE_URL      Storage service used to sign document paths
  CLAIMS_STORAGE_API_KEY  Storage API key
  CLAIMS_TIMEOUT_SECS     Request timeout, unset for none
  CLAIMS_LOG_LEVEL        Log level (default info)";

/// A parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show {
        claim_id: ClaimId,
    },
    Extract {
        claim_id: ClaimId,
        document_id: DocumentId,
    },
    Review {
        claim_id: ClaimId,
        document_id: DocumentId,
        decision: ReviewDecision,
        remarks: String,
    },
    Policy {
        policy_id: PolicyId,
        decision: PolicyDecision,
        reason: Option<String>,
    },
    Help,
}

impl Command {
    /// Parses arguments, excluding the program name.
    ///
    /// Trailing words after a decision are joined with single spaces.
    pub fn parse<I, S>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let Some((name, rest)) = args.split_first() else {
            return Err(CliError::usage("missing command"));
        };

        match name.as_str() {
            "list" => {
                expect_arity(name, rest, 0)?;
                Ok(Command::List)
            }
            "show" => {
                expect_arity(name, rest, 1)?;
                Ok(Command::Show {
                    claim_id: parse_id(&rest[0], "claim id")?,
                })
            }
            "extract" => {
                expect_arity(name, rest, 2)?;
                Ok(Command::Extract {
                    claim_id: parse_id(&rest[0], "claim id")?,
                    document_id: parse_id(&rest[1], "document id")?,
                })
            }
            "review" => {
                if rest.len() < 3 {
                    return Err(CliError::usage("review needs <claim_id> <document_id> approve|reject"));
                }
                let decision = match Verdict::parse(&rest[2])? {
                    Verdict::Approve => ReviewDecision::Approved,
                    Verdict::Reject => ReviewDecision::Rejected,
                };
                Ok(Command::Review {
                    claim_id: parse_id(&rest[0], "claim id")?,
                    document_id: parse_id(&rest[1], "document id")?,
                    decision,
                    remarks: rest[3..].join(" "),
                })
            }
            "policy" => {
                if rest.len() < 2 {
                    return Err(CliError::usage("policy needs <policy_id> approve|reject"));
                }
                let decision = match Verdict::parse(&rest[1])? {
                    Verdict::Approve => PolicyDecision::Approved,
                    Verdict::Reject => PolicyDecision::Rejected,
                };
                let reason = Some(rest[2..].join(" ")).filter(|r| !r.is_empty());
                Ok(Command::Policy {
                    policy_id: parse_id(&rest[0], "policy id")?,
                    decision,
                    reason,
                })
            }
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(CliError::usage(format!("unknown command '{}'", other))),
        }
    }
}

fn expect_arity(name: &str, rest: &[String], arity: usize) -> Result<(), CliError> {
    if rest.len() != arity {
        return Err(CliError::usage(format!(
            "{} takes {} argument(s), got {}",
            name,
            arity,
            rest.len()
        )));
    }
    Ok(())
}

fn parse_id<T>(raw: &str, what: &str) -> Result<T, CliError>
where
    T: std::str::FromStr,
{
    raw.parse()
        .map_err(|_| CliError::usage(format!("invalid {} '{}'", what, raw)))
}

#[derive(Debug, Clone, Copy)]
enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    fn parse(raw: &str) -> Result<Self, CliError> {
        match raw.to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(Verdict::Approve),
            "reject" | "rejected" => Ok(Verdict::Reject),
            other => Err(CliError::usage(format!(
                "decision must be approve or reject, got '{}'",
                other
            ))),
        }
    }
}
