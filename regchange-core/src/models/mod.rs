mod change_type;
mod contact;
mod financial_record;
mod init_data;
mod payment_status;
mod program;
mod registrant;
mod requests;
mod results;
mod settlement;

pub use change_type::ChangeType;
pub use contact::Contact;
pub use financial_record::FinancialRecord;
pub use init_data::InitData;
pub use payment_status::PaymentStatus;
pub use program::{ProgramDetail, ProgramOffering};
pub use registrant::Registrant;
pub use requests::{CancellationRequest, SubstitutionRequest, TransferRequest};
pub use results::{CancellationResult, ExecutionOutcome, SubstitutionResult, TransferResult};
pub use settlement::SettlementType;
