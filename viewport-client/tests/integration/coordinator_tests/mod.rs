mod test_answer_failure;
mod test_close_while_offer_pending;
