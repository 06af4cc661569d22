use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One entry of the handler set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateUser,
    GetUsers,
    PaginateUsers,
    PaginateAndSortUsers,
    QueryUsersByName,
    SortUsers,
    SoftDeleteUser,
    DeleteUser,
    UpdateUser,
}

#[derive(Debug, Error)]
#[error("unknown operation `{0}`")]
pub struct UnknownOperation(pub String);

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::CreateUser,
        Operation::GetUsers,
        Operation::PaginateUsers,
        Operation::PaginateAndSortUsers,
        Operation::QueryUsersByName,
        Operation::SortUsers,
        Operation::SoftDeleteUser,
        Operation::DeleteUser,
        Operation::UpdateUser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateUser => "createUser",
            Operation::GetUsers => "getUsers",
            Operation::PaginateUsers => "paginateUsers",
            Operation::PaginateAndSortUsers => "paginateAndSortUsers",
            Operation::QueryUsersByName => "queryUsersByName",
            Operation::SortUsers => "sortUsers",
            Operation::SoftDeleteUser => "softDeleteUser",
            Operation::DeleteUser => "deleteUser",
            Operation::UpdateUser => "updateUser",
        }
    }

    /// Message returned to the caller when the store call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CreateUser => "Could not create user",
            Operation::GetUsers => "Could not fetch users",
            Operation::PaginateUsers => "Could not paginate users",
            Operation::PaginateAndSortUsers => "Could not paginate and sort users",
            Operation::QueryUsersByName => "Could not query users by name",
            Operation::SortUsers => "Could not sort users",
            Operation::SoftDeleteUser => "Soft delete failed.",
            Operation::DeleteUser => "Could not delete user",
            Operation::UpdateUser => "Could not update user",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|operation| operation.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
