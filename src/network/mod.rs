pub mod envelope;
pub mod node;
pub mod runtime;

/*
    Communication is point-to-point and reliable: a member receives a
    message from another member if and only if the latter sent that
    message to the former, and messages between one sender and one
    receiver arrive in the order they were sent. Every pair of members,
    a member and itself included, shares its own bounded channel.
    There is no broadcast. A receive always names the sender it waits
    for, so a member that never sends leaves its receiver waiting.
*/
